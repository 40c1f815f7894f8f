use super::{Scheduler, Task, TaskHandle};
use std::{thread, time::Duration};
use tracing::trace;

/// A scheduler that creates a new thread for each unit of work.
#[derive(Clone, Copy, Debug, Default)]
pub struct NewThreadScheduler;

impl Scheduler for NewThreadScheduler {
  fn schedule(&self, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    thread::spawn(guarded);
    handle
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    trace!(?delay, "spawning delayed task");
    let handle = TaskHandle::new();
    let guarded = handle.guard(task);
    thread::spawn(move || {
      thread::sleep(delay);
      guarded();
    });
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::mpsc::channel;

  #[test]
  fn runs_on_another_thread() {
    let (sender, receiver) = channel();
    NewThreadScheduler.schedule(Box::new(move || {
      sender.send(thread::current().id()).unwrap();
    }));
    let id = receiver.recv().unwrap();
    assert_ne!(id, thread::current().id());
  }

  #[test]
  fn cancel_prevents_delayed_run() {
    let (sender, receiver) = channel::<()>();
    let handle = NewThreadScheduler.schedule_after(
      Duration::from_millis(50),
      Box::new(move || {
        let _ = sender.send(());
      }),
    );
    handle.cancel();
    assert!(receiver
      .recv_timeout(Duration::from_millis(300))
      .is_err());
  }
}
