use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CounterStore, Result, StoreError};

/// In-memory counter store.
///
/// Used by tests and as the default backend when no database is configured.
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryCounterStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
    fail_on_set: Arc<AtomicBool>,
}

impl InMemoryCounterStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`]
    /// until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail with [`StoreError::Unavailable`] while
    /// reads keep working.
    pub fn set_fail_on_set(&self, fail: bool) {
        self.fail_on_set.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of keys stored.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Returns true if no key has been set.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_available()?;
        if self.fail_on_set.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_unset_key_returns_none() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = InMemoryCounterStore::new();
        store.set("seats", "10".to_string()).await.unwrap();
        store.set("seats", "9".to_string()).await.unwrap();

        assert_eq!(store.get("seats").await.unwrap().as_deref(), Some("9"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryCounterStore::new();
        let other = store.clone();
        store.set("seats", "3".to_string()).await.unwrap();

        assert_eq!(other.get("seats").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn unavailable_store_fails_reads_and_writes() {
        let store = InMemoryCounterStore::new();
        store.set("seats", "5".to_string()).await.unwrap();
        store.set_unavailable(true);

        assert!(matches!(
            store.get("seats").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.set("seats", "4".to_string()).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert_eq!(store.get("seats").await.unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn fail_on_set_only_affects_writes() {
        let store = InMemoryCounterStore::new();
        store.set("seats", "5".to_string()).await.unwrap();
        store.set_fail_on_set(true);

        assert!(matches!(
            store.set("seats", "4".to_string()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.get("seats").await.unwrap().as_deref(), Some("5"));
    }
}
