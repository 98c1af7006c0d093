//! Persistent store trait definition.
//!
//! The `PersistentStore` trait is the durable key-value facility the schedule
//! store writes its state through. Values are opaque blobs; the engine owns
//! their JSON shape (see [`super::types`]).

use crate::error::Result;

/// Durable key-value storage for engine state.
///
/// Implementations must ensure:
/// - `set` replaces the whole value atomically (no torn blobs)
/// - `get` on a key that was never set returns `Ok(None)`
/// - `remove` on a missing key succeeds
pub trait PersistentStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `PillboxError::Persistence` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PillboxError::Persistence` if the write fails.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete the value under `key`.
    fn remove(&mut self, key: &str) -> Result<()>;
}
