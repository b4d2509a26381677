//! Progress storage traits for Chronoscape.
//!
//! This module defines the `StateStore` trait for session persistence.

use std::sync::Arc;

use crate::error::Result;

/// Trait for progress storage backends.
///
/// Implementations provide a small string key-value store. The progression
/// controller writes one serialized value per state channel and reads them
/// all back on startup.
pub trait StateStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value under a key, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Blanket implementation of StateStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: StateStore` is expected, which is
/// useful for sharing a store between tests and a controller.
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
