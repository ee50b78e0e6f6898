use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = HashMap<Uuid, Arc<AsyncMutex<()>>>;

/// One exclusive lock per entity id.
///
/// Entries exist only while someone holds or waits on them: the last guard
/// for an id removes its entry when dropped.
#[derive(Default)]
pub struct EntityLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`; released when the guard drops
    pub async fn acquire(&self, id: Uuid) -> EntityGuard {
        let ticket = Ticket {
            locks: self.locks.clone(),
            id,
        };
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id).or_default().clone()
        };
        let guard = lock.lock_owned().await;

        EntityGuard {
            _guard: guard,
            _ticket: ticket,
        }
    }

    /// Ids currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one entity.
// Field order matters: the mutex guard must drop before the ticket checks
// whether anyone else still references the lock.
pub struct EntityGuard {
    _guard: OwnedMutexGuard<()>,
    _ticket: Ticket,
}

/// Removes the id's entry once only the map still references its lock
struct Ticket {
    locks: Arc<Mutex<LockMap>>,
    id: Uuid,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_exclusive() {
        let locks = Arc::new(EntityLocks::new());
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = EntityLocks::new();

        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = tokio::time::timeout(Duration::from_secs(1), locks.acquire(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_entry_removed_with_last_guard() {
        let locks = EntityLocks::new();
        let held = locks.acquire(Uuid::new_v4()).await;
        drop(locks.acquire(Uuid::new_v4()).await);

        assert_eq!(locks.len(), 1);

        drop(held);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_someone_waits() {
        let locks = Arc::new(EntityLocks::new());
        let id = Uuid::new_v4();
        let first = locks.acquire(id).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(id).await })
        };
        // Let the waiter reach the lock
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        drop(first);
        assert_eq!(locks.len(), 1);

        let second = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locks.len(), 1);

        drop(second);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_many_ids_leave_nothing_behind() {
        let locks = EntityLocks::new();
        for _ in 0..50 {
            drop(locks.acquire(Uuid::new_v4()).await);
        }
        assert!(locks.is_empty());
    }
}
