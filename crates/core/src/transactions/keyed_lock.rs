//! Per-(user, asset) write serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockKey = (String, String);

/// Async mutex per `(user_id, asset_symbol)` key.
///
/// Holding the guard makes a read-check-append sequence atomic with respect to
/// every other writer on the same key. Writers on different keys never wait
/// on each other.
#[derive(Default)]
pub struct KeyedLock {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the key.
    pub async fn lock(&self, user_id: &str, asset_symbol: &str) -> OwnedMutexGuard<()> {
        let key = (user_id.to_string(), asset_symbol.to_string());
        // The map shard guard must be released before awaiting the mutex.
        let mutex = self.locks.entry(key).or_default().value().clone();
        mutex.lock_owned().await
    }

    /// Drops entries nobody is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLock::new());
        let guard = locks.lock("user-1", "BTC").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock("user-1", "BTC").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLock::new();
        let _btc = locks.lock("user-1", "BTC").await;
        let _eth = locks.lock("user-1", "ETH").await;
        let _other_user = locks.lock("user-2", "BTC").await;
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_prune_keeps_held_keys() {
        let locks = KeyedLock::new();
        let held = locks.lock("user-1", "BTC").await;
        drop(locks.lock("user-1", "ETH").await);

        locks.prune();
        assert_eq!(locks.len(), 1);

        drop(held);
        locks.prune();
        assert!(locks.is_empty());
    }
}
