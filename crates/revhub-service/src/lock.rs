//! Per-file-name mutual exclusion.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of async mutexes keyed by file name.
///
/// Entries are created on first use and pruned when the last holder or
/// waiter releases them, so the table only grows with concurrent work.
#[derive(Debug, Default)]
pub struct NameLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl NameLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `name`.
    pub async fn acquire(&self, name: &str) -> NameGuard<'_> {
        let mutex = {
            let entry = self.locks.entry(name.to_owned()).or_default();
            Arc::clone(entry.value())
        };
        let guard = mutex.lock_owned().await;
        NameGuard {
            locks: self,
            name: name.to_owned(),
            guard: Some(guard),
        }
    }

    /// Number of names with a live entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no name is currently locked or awaited.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one name; released on drop.
#[derive(Debug)]
pub struct NameGuard<'a> {
    locks: &'a NameLocks,
    name: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for NameGuard<'_> {
    fn drop(&mut self) {
        // Release first so the guard's own Arc no longer counts.
        self.guard.take();
        self.locks
            .locks
            .remove_if(&self.name, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_entries_are_pruned() {
        let locks = NameLocks::new();
        {
            let _a = locks.acquire("a.txt").await;
            let _b = locks.acquire("b.txt").await;
            assert_eq!(locks.len(), 2);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_name_is_exclusive() {
        let locks = Arc::new(NameLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire("a.txt").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }
}
