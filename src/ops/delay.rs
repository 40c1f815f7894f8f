use crate::{
  observable::{Observable, ObservingOptions},
  scheduler::Scheduler,
};
use std::time::Duration;

impl<T: Clone + Send + 'static> Observable<T> {
  /// Mirror the source, with each delivery postponed by `duration` on
  /// `scheduler`.
  ///
  /// Delivery order matches emission order as long as the scheduler runs
  /// equal-deadline tasks FIFO ([`TestScheduler`] guarantees this; the
  /// thread-based schedulers provide it on a best-effort basis).
  ///
  /// [`TestScheduler`]: crate::scheduler::TestScheduler
  pub fn delay<S>(&self, duration: Duration, scheduler: S) -> Observable<T>
  where
    S: Scheduler + Send + 'static,
  {
    let out = Observable::new(ObservingOptions::default());
    let target = out.clone();
    self.subscribe(move |value| {
      let target = target.clone();
      let value = value.clone();
      scheduler
        .schedule_after(duration, Box::new(move || target.update(value)));
    });
    out
  }
}
