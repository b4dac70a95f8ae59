//! Getter Module
//!
//! The local data source a group falls back to on a cache miss.

use std::fmt;

use crate::error::Result;

// == Getter ==
/// Loads the value for a key from the backing data source (database, files,
/// another service...).
///
/// The returned buffer is owned by the caller; the group stores it without
/// further copying.
pub trait Getter: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

// == Getter Fn ==
/// Adapts a plain function or closure into a [`Getter`].
pub struct GetterFn<F>(pub F);

impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for GetterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GetterFn")
    }
}
