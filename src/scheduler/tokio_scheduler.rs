use super::{Scheduler, Task, TaskHandle};
use std::time::Duration;
use tokio::runtime::Handle;

/// A scheduler that spawns tasks onto a tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { TokioScheduler { handle } }

  /// Capture the current runtime.
  ///
  /// # Panics
  ///
  /// Panics when called outside a tokio runtime context.
  pub fn current() -> Self { Self::new(Handle::current()) }
}

impl Scheduler for TokioScheduler {
  fn schedule(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    self.handle.spawn(async move { guarded() });
    handle
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    self.handle.spawn(async move {
      tokio::time::sleep(delay).await;
      guarded();
    });
    handle
  }
}
