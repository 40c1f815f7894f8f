//! Virtual-time scheduler for deterministic testing of `delay`,
//! `debounce` and future execution.
//!
//! Time only advances when explicitly instructed, and due tasks run
//! synchronously on the advancing thread, in (deadline, submission) order —
//! equal deadlines run FIFO. State is thread-local, so parallel tests stay
//! isolated.

use super::{Duration, Scheduler, Task, TaskHandle};
use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::{binary_heap::PeekMut, BinaryHeap},
};

struct QueuedTask {
  deadline: Duration,
  seq: usize,
  task: Task,
  handle: TaskHandle,
}

impl PartialEq for QueuedTask {
  fn eq(&self, other: &Self) -> bool {
    self.deadline == other.deadline && self.seq == other.seq
  }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for QueuedTask {
  // Reversed for a min-heap: earliest deadline first, FIFO within a
  // deadline.
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .deadline
      .cmp(&self.deadline)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

#[derive(Default)]
struct State {
  now: Duration,
  seq: usize,
  queue: BinaryHeap<QueuedTask>,
}

thread_local! {
  static STATE: RefCell<State> = RefCell::new(State::default());
}

/// The virtual-time scheduler. A zero-sized handle: every instance on the
/// same thread shares one clock and one task queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Clear the queue and rewind the clock. Call at the start of a test
  /// when the thread may have run another one.
  pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = State::default());
  }

  /// The current virtual time.
  pub fn now() -> Duration { STATE.with(|state| state.borrow().now) }

  /// Number of tasks waiting for their deadline.
  pub fn pending() -> usize {
    STATE.with(|state| state.borrow().queue.len())
  }

  /// Advance the clock by `by`, running every task whose deadline is
  /// reached, in order. Tasks scheduled while advancing run too if they
  /// fall within the window.
  pub fn advance(by: Duration) {
    let target = STATE.with(|state| state.borrow().now + by);
    loop {
      // Pop outside the task's execution so a task can schedule more work.
      let due = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let State { queue, now, .. } = &mut *state;
        let due = match queue.peek_mut() {
          Some(queued) if queued.deadline <= target => {
            let queued = PeekMut::pop(queued);
            *now = queued.deadline;
            Some(queued)
          }
          _ => None,
        };
        due
      });
      match due {
        Some(queued) => {
          if !queued.handle.is_cancelled() {
            (queued.task)();
          }
        }
        None => break,
      }
    }
    STATE.with(|state| state.borrow_mut().now = target);
  }

  /// Run everything in the queue, advancing the clock as far as needed.
  pub fn run_all() {
    while Self::pending() > 0 {
      let horizon = STATE.with(|state| {
        state
          .borrow()
          .queue
          .peek()
          .map(|queued| queued.deadline)
          .unwrap_or_default()
      });
      let now = Self::now();
      Self::advance(horizon.saturating_sub(now));
    }
  }

  fn enqueue(&self, deadline: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let queued_handle = handle.clone();
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      let seq = state.seq;
      state.seq += 1;
      state.queue.push(QueuedTask {
        deadline,
        seq,
        task,
        handle: queued_handle,
      });
    });
    handle
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, task: Task) -> TaskHandle {
    self.enqueue(Self::now(), task)
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
    self.enqueue(Self::now() + delay, task)
  }
}
