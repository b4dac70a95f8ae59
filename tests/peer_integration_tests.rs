//! Integration Tests for Peer Delegation
//!
//! Starts real HTTP nodes on loopback listeners and resolves keys across them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use peercache::{
    api::create_router, peers::HttpGetter, AppState, CacheError, GetterFn, Group, HttpPool,
    PeerGetter, PeerPicker, Registry,
};

// == Helper Functions ==

/// Serves `registry` on an ephemeral port from a dedicated runtime thread
/// and returns the node's base URL.
fn spawn_node(registry: Arc<Registry>) -> String {
    let (tx, rx) = mpsc::channel::<SocketAddr>();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, create_router(AppState::new(registry)))
                .await
                .unwrap();
        });
    });

    format!("http://{}", rx.recv().unwrap())
}

/// A `scores` group whose data source answers `"{tag}:{key}"` and counts calls.
fn tagged_group(registry: &Registry, tag: &'static str) -> (Arc<Group>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let group = registry.new_group(
        "scores",
        2 << 10,
        GetterFn(move |key: &str| -> peercache::Result<Vec<u8>> {
            counter.fetch_add(1, Ordering::SeqCst);
            if key == "Missing" {
                return Err(CacheError::NotFound(key.to_string()));
            }
            Ok(format!("{tag}:{key}").into_bytes())
        }),
    );
    (group, calls)
}

/// Sends every key to one fixed peer.
struct AlwaysPeer(Arc<dyn PeerGetter>);

impl PeerPicker for AlwaysPeer {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        Some(Arc::clone(&self.0))
    }
}

// == Tests ==

#[test]
fn test_http_getter_fetches_from_node() {
    let registry = Arc::new(Registry::new());
    let (_, calls) = tagged_group(&registry, "remote");
    let url = spawn_node(registry);

    let getter = HttpGetter::new(url);
    assert_eq!(getter.get("scores", "Tom").unwrap(), b"remote:Tom");
    assert_eq!(getter.get("scores", "Tom").unwrap(), b"remote:Tom");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(matches!(
        getter.get("scores", "Missing"),
        Err(CacheError::Peer(_))
    ));
    assert!(matches!(
        getter.get("players", "Tom"),
        Err(CacheError::Peer(_))
    ));
}

#[test]
fn test_group_delegates_to_owning_peer() {
    let remote_registry = Arc::new(Registry::new());
    let (_, remote_calls) = tagged_group(&remote_registry, "remote");
    let remote_url = spawn_node(remote_registry);

    let local_registry = Registry::new();
    let (local, local_calls) = tagged_group(&local_registry, "local");
    local
        .register_peers(Arc::new(AlwaysPeer(Arc::new(HttpGetter::new(remote_url)))))
        .unwrap();

    assert_eq!(local.get("Tom").unwrap().as_str(), "remote:Tom");
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
    assert_eq!(local.stats().peer_loads, 1);
}

#[test]
fn test_unreachable_peer_falls_back_to_local() {
    // nothing listens on port 9 of the loopback interface
    let local_registry = Registry::new();
    let (local, local_calls) = tagged_group(&local_registry, "local");
    local
        .register_peers(Arc::new(AlwaysPeer(Arc::new(HttpGetter::new(
            "http://127.0.0.1:9",
        )))))
        .unwrap();

    assert_eq!(local.get("Tom").unwrap().as_str(), "local:Tom");
    assert_eq!(local.get("Tom").unwrap().as_str(), "local:Tom");
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);

    let stats = local.stats();
    assert_eq!(stats.peer_errors, 1);
    assert_eq!(stats.cache_hits, 1);
}

#[test]
fn test_two_node_pool_agrees_on_owners() {
    let registry_a = Arc::new(Registry::new());
    let registry_b = Arc::new(Registry::new());
    let (group_a, calls_a) = tagged_group(&registry_a, "a");
    let (group_b, calls_b) = tagged_group(&registry_b, "b");
    let url_a = spawn_node(Arc::clone(&registry_a));
    let url_b = spawn_node(Arc::clone(&registry_b));

    let peers = vec![url_a.clone(), url_b.clone()];
    let pool_a = Arc::new(HttpPool::new(url_a, 50));
    let pool_b = Arc::new(HttpPool::new(url_b, 50));
    pool_a.set_peers(peers.clone());
    pool_b.set_peers(peers);
    group_a.register_peers(Arc::clone(&pool_a) as Arc<dyn PeerPicker>).unwrap();
    group_b.register_peers(Arc::clone(&pool_b) as Arc<dyn PeerPicker>).unwrap();

    let keys: Vec<String> = (0..20).map(|i| format!("key{i}")).collect();
    for key in &keys {
        let from_a = group_a.get(key).unwrap();
        let from_b = group_b.get(key).unwrap();
        assert_eq!(from_a, from_b, "nodes disagree on {key}");
    }

    // each key was loaded exactly once, by its owner
    assert_eq!(
        calls_a.load(Ordering::SeqCst) + calls_b.load(Ordering::SeqCst),
        keys.len()
    );
}
