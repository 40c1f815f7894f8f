//! Chaining helpers for observables carrying a success/failure result.
//!
//! Each helper targets one branch of the result and passes the other
//! through untouched, so a pipeline reads as a straight line of
//! success-path steps with failures flowing alongside as data.

use crate::{future::Future, observable::Observable, scheduler::Scheduler};

impl<S, E> Observable<Result<S, E>>
where
  S: Clone + Send + 'static,
  E: Clone + Send + 'static,
{
  /// Continue in the success case; failures pass through untouched.
  pub fn then<U>(
    &self,
    transform: impl Fn(&S) -> U + Send + 'static,
  ) -> Observable<Result<U, E>>
  where
    U: Send + 'static,
  {
    self.map(move |result| match result {
      Ok(value) => Ok(transform(value)),
      Err(error) => Err(error.clone()),
    })
  }

  /// Continue in the success case with a transform that can itself fail.
  pub fn and_then<U>(
    &self,
    transform: impl Fn(&S) -> Result<U, E> + Send + 'static,
  ) -> Observable<Result<U, E>>
  where
    U: Send + 'static,
  {
    self.map(move |result| match result {
      Ok(value) => transform(value),
      Err(error) => Err(error.clone()),
    })
  }

  /// Continue in the failure case; successes pass through untouched.
  pub fn then_error<F>(
    &self,
    transform: impl Fn(&E) -> F + Send + 'static,
  ) -> Observable<Result<S, F>>
  where
    F: Send + 'static,
  {
    self.map(move |result| match result {
      Ok(value) => Ok(value.clone()),
      Err(error) => Err(transform(error)),
    })
  }

  /// Continue in the failure case with a transform that can recover or
  /// re-fail into another failure domain.
  pub fn or_else<F>(
    &self,
    transform: impl Fn(&E) -> Result<S, F> + Send + 'static,
  ) -> Observable<Result<S, F>>
  where
    F: Send + 'static,
  {
    self.map(move |result| match result {
      Ok(value) => Ok(value.clone()),
      Err(error) => transform(error),
    })
  }

  /// Continue in the success case with a transform returning a derived
  /// cell; its updates are forwarded as successes, and failures
  /// short-circuit straight to the output.
  pub fn then_cell<U>(
    &self,
    transform: impl Fn(&S) -> Observable<U> + Send + 'static,
  ) -> Observable<Result<U, E>>
  where
    U: Clone + Send + 'static,
  {
    let out = Observable::new(self.options());
    let target = out.clone();
    self.subscribe(move |result| match result {
      Ok(value) => {
        let target = target.clone();
        transform(value)
          .subscribe(move |inner| target.update(Ok(inner.clone())));
      }
      Err(error) => target.update(Err(error.clone())),
    });
    out
  }

  /// Continue in the success case with a future, executed on `scheduler`;
  /// its outcome lands in the output's result channel.
  pub fn then_future<U, Sch>(
    &self,
    scheduler: Sch,
    transform: impl Fn(&S) -> Future<U, E> + Send + 'static,
  ) -> Observable<Result<U, E>>
  where
    U: Send + 'static,
    Sch: Scheduler + Clone + Send + 'static,
  {
    let out = Observable::new(self.options());
    let target = out.clone();
    self.subscribe(move |result| match result {
      Ok(value) => {
        let target = target.clone();
        transform(value)
          .execute(scheduler.clone(), move |outcome| target.update(outcome));
      }
      Err(error) => target.update(Err(error.clone())),
    });
    out
  }

  /// Observe only successful values. Returns a handle to the same cell
  /// for chaining; the tap stays subscribed for the cell's lifetime.
  pub fn next(
    &self,
    mut block: impl FnMut(&S) + Send + 'static,
  ) -> Observable<Result<S, E>> {
    self.subscribe(move |result| {
      if let Ok(value) = result {
        block(value);
      }
    });
    self.clone()
  }

  /// Observe only failures. Returns a handle to the same cell for
  /// chaining.
  pub fn error(
    &self,
    mut block: impl FnMut(&E) + Send + 'static,
  ) -> Observable<Result<S, E>> {
    self.subscribe(move |result| {
      if let Err(error) = result {
        block(error);
      }
    });
    self.clone()
  }

  /// The success payload of the retained value, if the cell retains one
  /// and it is a success.
  pub fn peek(&self) -> Option<S> {
    self.value().and_then(|result| result.ok())
  }
}

#[cfg(test)]
mod test {
  use crate::{lock::Lock, prelude::*};

  #[derive(Clone, Debug, PartialEq)]
  struct Broken(&'static str);

  fn results() -> Observable<Result<i32, Broken>> {
    Observable::new(ObservingOptions::default())
  }

  #[test]
  fn then_maps_successes_and_passes_failures() {
    let source = results();
    let chained = source.then(|v| v * 2);
    source.update(Ok(21));
    assert_eq!(chained.value(), Some(Ok(42)));
    source.update(Err(Broken("boom")));
    assert_eq!(chained.value(), Some(Err(Broken("boom"))));
  }

  #[test]
  fn and_then_can_fail() {
    let source = results();
    let chained = source.and_then(|v| {
      if *v > 0 {
        Ok(*v)
      } else {
        Err(Broken("negative"))
      }
    });
    source.update(Ok(-1));
    assert_eq!(chained.value(), Some(Err(Broken("negative"))));
  }

  #[test]
  fn then_error_rewrites_only_failures() {
    let source = results();
    let chained = source.then_error(|e| format!("wrapped: {}", e.0));
    source.update(Ok(1));
    assert_eq!(chained.value(), Some(Ok(1)));
    source.update(Err(Broken("boom")));
    assert_eq!(
      chained.value(),
      Some(Err(String::from("wrapped: boom")))
    );
  }

  #[test]
  fn or_else_can_recover() {
    let source = results();
    let chained = source.or_else(|_: &Broken| Ok::<i32, Broken>(0));
    source.update(Err(Broken("boom")));
    assert_eq!(chained.value(), Some(Ok(0)));
  }

  #[test]
  fn then_cell_forwards_inner_successes() {
    let source = results();
    let chained = source.then_cell(|v| Observable::of(v * 10));
    source.update(Ok(4));
    assert_eq!(chained.value(), Some(Ok(40)));
    source.update(Err(Broken("boom")));
    assert_eq!(chained.value(), Some(Err(Broken("boom"))));
  }

  #[test]
  fn then_future_lands_outcomes_in_the_channel() {
    let source = results();
    let chained =
      source.then_future(ImmediateScheduler, |v| Future::ok(v + 1));
    source.update(Ok(1));
    assert_eq!(chained.value(), Some(Ok(2)));
  }

  #[test]
  fn taps_see_only_their_branch() {
    let successes = Lock::own(Vec::new());
    let failures = Lock::own(Vec::new());
    let source = results();
    let s = successes.clone();
    let f = failures.clone();
    source
      .next(move |v| s.with(|list| list.push(*v)))
      .error(move |e| f.with(|list| list.push(e.clone())));
    source.update(Ok(1));
    source.update(Err(Broken("boom")));
    source.update(Ok(2));
    assert_eq!(successes.with(|list| list.clone()), vec![1, 2]);
    assert_eq!(failures.with(|list| list.clone()), vec![Broken("boom")]);
  }

  #[test]
  fn peek_sees_only_retained_successes() {
    let source = results();
    assert_eq!(source.peek(), None);
    source.update(Ok(3));
    assert_eq!(source.peek(), Some(3));
    source.update(Err(Broken("boom")));
    assert_eq!(source.peek(), None);
  }
}
