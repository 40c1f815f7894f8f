use crate::{
  lock::Lock,
  observable::{Observable, ObservingOptions},
  scheduler::{Scheduler, TaskHandle},
};
use std::time::{Duration, Instant};

struct DebounceState {
  last_forwarded: Option<Instant>,
  pending: Option<TaskHandle>,
  // Bumped on every incoming value; an armed task only fires if it is
  // still the newest one.
  generation: u64,
}

impl<T: Clone + Send + 'static> Observable<T> {
  /// Trailing-edge debounce: a value is forwarded immediately if at least
  /// `duration` has elapsed since the last forwarded value; otherwise a
  /// timer is armed for the remaining wait and the newest value wins.
  /// Bursts collapse to their last value, delivered once the burst goes
  /// quiet.
  pub fn debounce<S>(&self, duration: Duration, scheduler: S) -> Observable<T>
  where
    S: Scheduler + Send + 'static,
  {
    let out = Observable::new(ObservingOptions::default());
    let state = Lock::own(DebounceState {
      last_forwarded: None,
      pending: None,
      generation: 0,
    });
    let target = out.clone();
    self.subscribe(move |value| {
      let state_for_task = state.clone();
      let target_for_task = target.clone();
      let value = value.clone();
      state.with(|st| {
        st.generation += 1;
        let now = Instant::now();
        let elapsed = st.last_forwarded.map(|at| now.duration_since(at));
        if let Some(pending) = st.pending.take() {
          pending.cancel();
        }
        match elapsed {
          Some(elapsed) if elapsed < duration => {
            let generation = st.generation;
            let fire = move || {
              let due = state_for_task.with(|st| {
                if st.generation == generation {
                  st.last_forwarded = Some(Instant::now());
                  st.pending = None;
                  true
                } else {
                  false
                }
              });
              if due {
                target_for_task.update(value);
              }
            };
            st.pending = Some(
              scheduler.schedule_after(duration - elapsed, Box::new(fire)),
            );
          }
          _ => {
            st.last_forwarded = Some(now);
            target.update(value);
          }
        }
      });
    });
    out
  }
}

#[cfg(test)]
mod test {
  use crate::{lock::Lock, prelude::*};
  use std::thread;

  #[test]
  fn bursts_collapse_to_the_last_value() {
    TestScheduler::reset();
    let received = Lock::own(Vec::new());
    let source = Observable::new(ObservingOptions::default());
    let quiet = source.debounce(Duration::from_secs(10), TestScheduler);
    let r = received.clone();
    quiet.subscribe(move |v: &i32| r.with(|list| list.push(*v)));
    // First value goes straight through, the burst behind it collapses.
    source.update(1);
    source.update(2);
    source.update(3);
    assert_eq!(received.with(|list| list.clone()), vec![1]);
    TestScheduler::advance(Duration::from_secs(10));
    assert_eq!(received.with(|list| list.clone()), vec![1, 3]);
  }

  #[test]
  fn quiet_gap_forwards_immediately() {
    let received = Lock::own(Vec::new());
    let source = Observable::new(ObservingOptions::default());
    let quiet = source.debounce(Duration::from_millis(1), NewThreadScheduler);
    let r = received.clone();
    quiet.subscribe(move |v: &i32| r.with(|list| list.push(*v)));
    source.update(1);
    thread::sleep(Duration::from_millis(10));
    source.update(2);
    assert_eq!(received.with(|list| list.clone()), vec![1, 2]);
  }
}
