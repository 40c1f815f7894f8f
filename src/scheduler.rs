//! The scheduler capability the core consumes from its environment.
//!
//! The crate owns no thread pool and no timer wheel: everything that hands
//! off execution (`delay`, `debounce`, `Future::execute`, …) takes an
//! explicit [`Scheduler`]. There is deliberately no global default.

pub mod test_scheduler;
mod thread_scheduler;

#[cfg(feature = "futures-scheduler")]
mod pool_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use pool_scheduler::PoolScheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;
pub use test_scheduler::TestScheduler;
pub use thread_scheduler::NewThreadScheduler;

pub use std::time::{Duration, Instant};
use std::{
  sync::atomic::{AtomicBool, Ordering},
  sync::Arc,
  thread,
};

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// Something that can run a callback now, or at a later point, on some
/// thread.
///
/// `schedule_after` reads the host's monotonic clock; implementations
/// should run tasks with equal deadlines in FIFO order (`delay` relies on
/// it for ordered delivery).
pub trait Scheduler {
  /// Run `task` as soon as the scheduler can.
  fn schedule(&self, task: Task) -> TaskHandle;

  /// Run `task` once `delay` has elapsed.
  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Cancellation handle for a scheduled task.
///
/// Cancellation is immediate but not synchronized with a task already past
/// its cancellation check: a task that has started running will finish.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle {
  cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  pub fn cancel(&self) { self.cancelled.store(true, Ordering::Release); }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }

  /// Wrap `task` so it becomes a no-op once this handle is cancelled.
  /// Scheduler implementations run the guarded closure instead of the raw
  /// task.
  pub fn guard(&self, task: Task) -> impl FnOnce() + Send {
    let handle = self.clone();
    move || {
      if !handle.is_cancelled() {
        task()
      }
    }
  }
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  fn schedule(&self, task: Task) -> TaskHandle { (**self).schedule(task) }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    (**self).schedule_after(delay, task)
  }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
  fn schedule(&self, task: Task) -> TaskHandle { (**self).schedule(task) }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    (**self).schedule_after(delay, task)
  }
}

/// Runs every task inline on the calling thread; `schedule_after` blocks
/// the caller for the full delay. Useful for tests and for executing
/// future chains synchronously.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    task();
    handle
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    thread::sleep(delay);
    handle.guard(task)();
    handle
  }
}
