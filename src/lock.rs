//! The crate's single locking idiom.
//!
//! [`Lock<T>`] is a mutex that owns its data and exposes a single scoped
//! [`with`](Lock::with) helper: every access happens inside a closure while
//! the lock is held. Grounded on the teacher's `MutArc`/`Arc<Mutex<T>>`
//! pattern and the original `Lock.swift` `lock(_ closure:)`; std only.

use std::sync::{Arc, Mutex};

/// A mutex that owns a `T` and lends it to a scoped closure.
///
/// Poisoning is treated as a bug: a poisoned lock panics via `unwrap`,
/// matching the teacher's `.lock().unwrap()` convention.
pub struct Lock<T> {
  inner: Mutex<T>,
}

impl<T> Lock<T> {
  /// Wrap `value` in a new lock.
  pub fn new(value: T) -> Self {
    Lock { inner: Mutex::new(value) }
  }

  /// Wrap `value` in a lock shared through an [`Arc`].
  pub fn own(value: T) -> Arc<Lock<T>> {
    Arc::new(Lock::new(value))
  }

  /// Run `f` with exclusive access to the guarded value and return its
  /// result. The lock is held for the duration of the closure.
  pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = self.inner.lock().unwrap();
    f(&mut guard)
  }
}
