use std::sync::{Arc, RwLock};

// ---------------------------------------------------------------------------
// Whole-value snapshot publication
// ---------------------------------------------------------------------------

/// A value that is only ever replaced whole.
///
/// `load` hands out an `Arc` to the current value; a reader keeps working
/// against that value even if a writer publishes a new one meanwhile. The
/// lock is held only for the pointer copy/swap, never while building.
#[derive(Debug, Default)]
pub struct SnapshotCell<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self { current: RwLock::new(Arc::new(value)) }
    }

    pub fn load(&self) -> Arc<T> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // A pointer swap cannot leave the value half-written
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publish `value`, returning the previous snapshot.
    pub fn store(&self, value: T) -> Arc<T> {
        let next = Arc::new(value);
        match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_keeps_old_value_after_store() {
        let cell = SnapshotCell::new(vec![1, 2, 3]);
        let before = cell.load();
        let prev = cell.store(vec![4]);
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*prev, vec![1, 2, 3]);
        assert_eq!(*cell.load(), vec![4]);
    }

    #[test]
    fn concurrent_readers_see_whole_values() {
        let cell = Arc::new(SnapshotCell::new(vec![0u32; 64]));
        let writer = {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                for i in 1..200u32 {
                    cell.store(vec![i; 64]);
                }
            })
        };
        for _ in 0..500 {
            let snap = cell.load();
            assert!(snap.iter().all(|v| *v == snap[0]), "torn snapshot");
        }
        writer.join().unwrap();
    }
}
