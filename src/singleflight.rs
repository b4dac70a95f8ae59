//! Single Flight Module
//!
//! Collapses concurrent calls for the same key into a single execution whose
//! outcome is handed to every caller.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

enum Outcome<T> {
    Running,
    Done(T),
    /// The leader panicked; waiters start over.
    Abandoned,
}

struct CallState<T> {
    outcome: Outcome<T>,
    /// Callers blocked in `wait`; only read by tests to synchronise threads.
    waiters: usize,
}

/// One in-flight execution for a key.
struct Call<T> {
    state: Mutex<CallState<T>>,
    done: Condvar,
}

enum Role<T> {
    Leader(Arc<Call<T>>),
    Waiter(Arc<Call<T>>),
}

impl<T: Clone> Call<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(CallState {
                outcome: Outcome::Running,
                waiters: 0,
            }),
            done: Condvar::new(),
        }
    }

    /// Blocks until the leader finishes. `None` means the leader panicked.
    fn wait(&self) -> Option<T> {
        let mut state = self.state.lock();
        state.waiters += 1;
        while matches!(state.outcome, Outcome::Running) {
            self.done.wait(&mut state);
        }
        state.waiters -= 1;
        match &state.outcome {
            Outcome::Done(value) => Some(value.clone()),
            Outcome::Running | Outcome::Abandoned => None,
        }
    }

    fn complete(&self, outcome: Outcome<T>) {
        self.state.lock().outcome = outcome;
        self.done.notify_all();
    }
}

// == Flight ==
/// Per-key call deduplication.
///
/// While a computation for a key is running, further [`run`](Flight::run)
/// calls for that key block and receive a clone of its result instead of
/// computing their own. Results are not retained: once the computation
/// returns and its record is dropped, the next call for the key runs again.
pub struct Flight<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T> Default for Flight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> fmt::Debug for Flight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flight")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

impl<T: Clone> Flight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Run ==
    /// Executes `f` for `key` unless an execution is already in flight, in
    /// which case this call waits for it and returns its result.
    ///
    /// `f` runs on the calling thread with no lock held. If it panics, the
    /// record is removed, the panic continues on this thread, and any callers
    /// waiting on it retry as if they had just arrived.
    pub fn run<F>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let call = loop {
            match self.claim(key) {
                Role::Leader(call) => break call,
                Role::Waiter(call) => {
                    if let Some(value) = call.wait() {
                        return value;
                    }
                }
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                call.complete(Outcome::Done(value.clone()));
                self.release(key, &call);
                value
            }
            Err(payload) => {
                call.complete(Outcome::Abandoned);
                self.release(key, &call);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Number of keys with a computation in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    fn claim(&self, key: &str) -> Role<T> {
        let mut calls = self.calls.lock();
        if let Some(existing) = calls.get(key) {
            return Role::Waiter(Arc::clone(existing));
        }
        let call = Arc::new(Call::new());
        calls.insert(key.to_string(), Arc::clone(&call));
        Role::Leader(call)
    }

    fn release(&self, key: &str, call: &Arc<Call<T>>) {
        let mut calls = self.calls.lock();
        if calls.get(key).is_some_and(|c| Arc::ptr_eq(c, call)) {
            calls.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn waiters(&self, key: &str) -> usize {
        self.calls
            .lock()
            .get(key)
            .map_or(0, |call| call.state.lock().waiters)
    }
}
