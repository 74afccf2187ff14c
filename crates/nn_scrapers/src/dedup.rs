use nn_core::{ArticleRepository, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

/// Answers "is this title already stored?" before any expensive work.
#[derive(Clone)]
pub struct Deduplicator {
    repository: Arc<dyn ArticleRepository>,
}

impl Deduplicator {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    pub async fn exists(&self, title: &str) -> Result<bool> {
        Ok(self.repository.find_by_title(title).await?.is_some())
    }
}

/// A title's mutex and how many guards or waiters still refer to it.
#[derive(Default)]
struct Slot {
    mutex: Arc<TokioMutex<()>>,
    users: usize,
}

type LockMap = HashMap<String, Slot>;

/// Per-title async locks, held from the dedup check until the save.
#[derive(Clone, Default)]
pub struct TitleLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl TitleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, title: &str) -> TitleGuard {
        let mutex = {
            let mut map = self.map();
            let slot = map.entry(title.to_string()).or_default();
            slot.users += 1;
            slot.mutex.clone()
        };
        // registered before the wait so a dropped waiter still cleans up
        let entry = Entry {
            title: title.to_string(),
            locks: self.clone(),
        };
        let guard = mutex.lock_owned().await;

        TitleGuard {
            _guard: guard,
            _entry: entry,
        }
    }

    /// Number of titles currently locked or waited on.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map(&self) -> std::sync::MutexGuard<'_, LockMap> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release(&self, title: &str) {
        let mut map = self.map();
        let idle = match map.get_mut(title) {
            Some(slot) => {
                slot.users -= 1;
                slot.users == 0
            }
            None => false,
        };
        if idle {
            map.remove(title);
        }
    }
}

/// Removes the title's map entry once nobody holds or waits on it.
struct Entry {
    title: String,
    locks: TitleLocks,
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.locks.release(&self.title);
    }
}

/// Held from the dedup check until the save. Fields drop in order: the
/// mutex is released before the entry is checked.
pub struct TitleGuard {
    _guard: OwnedMutexGuard<()>,
    _entry: Entry,
}
