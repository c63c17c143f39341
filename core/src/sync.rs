use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(rw: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rw.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(rw: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rw.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn poisoned_rwlock_still_usable() {
        let slot = RwLock::new(1);
        let result = panic::catch_unwind(|| {
            let _guard = slot.write().unwrap();
            panic!("writer died");
        });
        assert!(result.is_err());
        assert!(slot.is_poisoned());

        *write(&slot) = 2;
        assert_eq!(*read(&slot), 2);
    }

    #[test]
    fn poisoned_mutex_still_usable() {
        let slot = Mutex::new(vec![1]);
        let _ = panic::catch_unwind(|| {
            let _guard = slot.lock().unwrap();
            panic!("holder died");
        });
        lock(&slot).push(2);
        assert_eq!(*lock(&slot), vec![1, 2]);
    }
}
