use async_trait::async_trait;

use crate::Result;

/// Core trait for counter store implementations.
///
/// Values are stored as text so that whatever another writer put under a key
/// can be read back verbatim; interpreting the value is up to the caller.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` if the key has never been set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value stored under `key`.
    ///
    /// The write is atomic with respect to other writers of the same key.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
