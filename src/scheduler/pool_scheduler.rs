use super::{Scheduler, Task, TaskHandle};
use futures::executor::ThreadPool;
use std::{io, time::Duration};

/// A scheduler backed by a shared [`futures`] thread pool.
///
/// Cloning is cheap and clones share the pool.
#[derive(Clone)]
pub struct PoolScheduler {
  pool: ThreadPool,
}

impl PoolScheduler {
  pub fn new() -> io::Result<Self> {
    Ok(PoolScheduler { pool: ThreadPool::new()? })
  }
}

impl From<ThreadPool> for PoolScheduler {
  fn from(pool: ThreadPool) -> Self { PoolScheduler { pool } }
}

impl Scheduler for PoolScheduler {
  fn schedule(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    self.pool.spawn_ok(async move { guarded() });
    handle
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    self.pool.spawn_ok(async move {
      futures_time::task::sleep(delay.into()).await;
      guarded();
    });
    handle
  }
}
