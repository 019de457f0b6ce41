use std::sync::{Arc, Mutex, PoisonError};

/// A lazily loaded, process-wide dataset.
///
/// The first [`get_or_load`](Self::get_or_load) runs the loader while holding
/// the lock, so concurrent callers wait for that one read instead of repeating
/// it. Later calls share the same `Arc` until [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct DatasetCache<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value, running `load` if nothing is cached.
    pub fn get_or_load(&self, load: impl FnOnce() -> T) -> Arc<T> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.as_ref() {
            return Arc::clone(value);
        }
        let value = Arc::new(load());
        *slot = Some(Arc::clone(&value));
        value
    }

    /// Drop the cached value; the next access loads again.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn loads_once_until_invalidated() {
        let cache = DatasetCache::new();
        let calls = AtomicUsize::new(0);
        let load = || calls.fetch_add(1, Ordering::SeqCst) + 1;

        assert!(!cache.is_loaded());
        assert_eq!(*cache.get_or_load(load), 1);
        assert_eq!(*cache.get_or_load(load), 1);
        assert!(cache.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert_eq!(*cache.get_or_load(load), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_first_access_reads_once() {
        let cache = Arc::new(DatasetCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    *cache.get_or_load(|| {
                        std::thread::sleep(std::time::Duration::from_millis(10));
                        calls.fetch_add(1, Ordering::SeqCst)
                    })
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
