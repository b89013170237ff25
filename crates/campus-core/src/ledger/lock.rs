//! Per-entity serialization for ledger operations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Async mutex keyed by entity id.
///
/// Holding the guard for a key serializes the whole
/// read-check-write-recompute sequence of a ledger operation against
/// every other operation targeting the same entity, so no caller can
/// observe a relation row without its recomputed counter.
pub(crate) struct KeyedLock {
    slots: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl KeyedLock {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key).or_default())
        };
        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_key_excludes() {
        let lock = KeyedLock::new();
        let key = Uuid::new_v4();

        let guard = lock.acquire(key).await;

        let second = tokio::time::timeout(Duration::from_millis(20), lock.acquire(key)).await;
        assert!(second.is_err(), "second acquire should block");

        drop(guard);
        let _guard = lock.acquire(key).await;
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let lock = KeyedLock::new();
        let _a = lock.acquire(Uuid::new_v4()).await;
        let _b = lock.acquire(Uuid::new_v4()).await;
    }
}
