use crate::{
  observable::{Observable, ObservingOptions},
  scheduler::Scheduler,
};
use std::sync::Arc;

/// The one-shot callback a [`Future`]'s operation completes into.
pub type Completion<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

type Operation<T, E> = Arc<dyn Fn(Completion<T, E>) + Send + Sync>;

/// A reusable recipe for one asynchronous, possibly-failing computation.
///
/// A `Future` stores its operation without running it; nothing happens
/// until [`execute`](Self::execute) (or [`run`](Self::run)) is called.
/// Executing twice runs the operation twice, independently — a `Future`
/// is a recipe, not a cached result. Combinators build a new `Future`
/// whose operation runs the upstream one and threads its result through
/// the transformation.
///
/// ```
/// use rxcell::prelude::*;
///
/// let doubled = Future::<i32, String>::ok(21).map(|v| v * 2);
/// doubled.run(|result| assert_eq!(result, Ok(42)));
/// ```
pub struct Future<T, E> {
  operation: Operation<T, E>,
}

impl<T, E> Clone for Future<T, E> {
  fn clone(&self) -> Self { Future { operation: self.operation.clone() } }
}

impl<T, E> Future<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  /// Wrap an asynchronous operation. The operation receives the
  /// completion to invoke, exactly once per execution, whenever and
  /// wherever it finishes.
  pub fn new(
    operation: impl Fn(Completion<T, E>) + Send + Sync + 'static,
  ) -> Self {
    Future { operation: Arc::new(operation) }
  }

  /// A future that completes immediately with `result` on every
  /// execution.
  pub fn ready(result: Result<T, E>) -> Self
  where
    T: Clone + Sync,
    E: Clone + Sync,
  {
    Self::new(move |completion| completion(result.clone()))
  }

  /// A future that always succeeds with `value`.
  pub fn ok(value: T) -> Self
  where
    T: Clone + Sync,
  {
    Self::new(move |completion| completion(Ok(value.clone())))
  }

  /// A future that always fails with `error`.
  pub fn err(error: E) -> Self
  where
    E: Clone + Sync,
  {
    Self::new(move |completion| completion(Err(error.clone())))
  }

  /// Run the operation on the calling thread; `completion` is invoked
  /// wherever the operation decides to complete.
  pub fn run(&self, completion: impl FnOnce(Result<T, E>) + Send + 'static) {
    (*self.operation)(Box::new(completion));
  }

  /// Execute the operation, marshaling the result to `completion` through
  /// `scheduler` so continuations land on the thread the caller chose.
  pub fn execute<S>(
    &self,
    scheduler: S,
    completion: impl FnOnce(Result<T, E>) + Send + 'static,
  ) where
    S: Scheduler + Send + 'static,
  {
    self.run(move |result| {
      scheduler.schedule(Box::new(move || completion(result)));
    });
  }

  /// [`execute`](Self::execute) with the two branches split into separate
  /// callbacks.
  pub fn execute_split<S>(
    &self,
    scheduler: S,
    on_success: impl FnOnce(T) + Send + 'static,
    on_failure: impl FnOnce(E) + Send + 'static,
  ) where
    S: Scheduler + Send + 'static,
  {
    self.execute(scheduler, move |result| match result {
      Ok(value) => on_success(value),
      Err(error) => on_failure(error),
    });
  }

  /// Apply a function to the successful result; a failure is propagated
  /// untouched.
  pub fn map<U>(
    &self,
    transform: impl Fn(T) -> U + Send + Sync + 'static,
  ) -> Future<U, E>
  where
    U: Send + 'static,
  {
    let source = self.clone();
    let transform = Arc::new(transform);
    Future::new(move |completion: Completion<U, E>| {
      let transform = transform.clone();
      source.run(move |result| completion(result.map(|v| (*transform)(v))));
    })
  }

  /// Apply a fallible function to the successful result; transform
  /// failures are converted into the failure channel via `map_err`.
  pub fn try_map<U, X>(
    &self,
    transform: impl Fn(T) -> Result<U, X> + Send + Sync + 'static,
    map_err: impl Fn(X) -> E + Send + Sync + 'static,
  ) -> Future<U, E>
  where
    U: Send + 'static,
    X: Send + 'static,
  {
    let source = self.clone();
    let transform = Arc::new(transform);
    let map_err = Arc::new(map_err);
    Future::new(move |completion: Completion<U, E>| {
      let transform = transform.clone();
      let map_err = map_err.clone();
      source.run(move |result| {
        completion(
          result.and_then(|v| (*transform)(v).map_err(|e| (*map_err)(e))),
        );
      });
    })
  }

  /// Chain a dependent future built from the successful result; a failure
  /// is propagated untouched.
  pub fn flat_map<U>(
    &self,
    transform: impl Fn(T) -> Future<U, E> + Send + Sync + 'static,
  ) -> Future<U, E>
  where
    U: Send + 'static,
  {
    let source = self.clone();
    let transform = Arc::new(transform);
    Future::new(move |completion: Completion<U, E>| {
      let transform = transform.clone();
      source.run(move |result| match result {
        Ok(value) => (*transform)(value).run(completion),
        Err(error) => completion(Err(error)),
      });
    })
  }

  /// [`flat_map`](Self::flat_map) with a transform that can fail before
  /// producing a future; its failures are mapped into the failure channel
  /// via `map_err`.
  pub fn try_flat_map<U, X>(
    &self,
    transform: impl Fn(T) -> Result<Future<U, E>, X> + Send + Sync + 'static,
    map_err: impl Fn(X) -> E + Send + Sync + 'static,
  ) -> Future<U, E>
  where
    U: Send + 'static,
    X: Send + 'static,
  {
    let source = self.clone();
    let transform = Arc::new(transform);
    let map_err = Arc::new(map_err);
    Future::new(move |completion: Completion<U, E>| {
      let transform = transform.clone();
      let map_err = map_err.clone();
      source.run(move |result| match result {
        Ok(value) => match (*transform)(value) {
          Ok(next) => next.run(completion),
          Err(error) => completion(Err((*map_err)(error))),
        },
        Err(error) => completion(Err(error)),
      });
    })
  }

  /// Chain two dependent futures. The success-only sibling of
  /// [`flat_map`](Self::flat_map), kept for call sites that read better
  /// as a pipeline of steps.
  #[inline]
  pub fn and_then<U>(
    &self,
    transform: impl Fn(T) -> Future<U, E> + Send + Sync + 'static,
  ) -> Future<U, E>
  where
    U: Send + 'static,
  {
    self.flat_map(transform)
  }

  /// Convert any failure into a success; the resulting future cannot
  /// fail.
  pub fn recover(
    &self,
    handler: impl Fn(E) -> T + Send + Sync + 'static,
  ) -> Future<T, E> {
    let source = self.clone();
    let handler = Arc::new(handler);
    Future::new(move |completion: Completion<T, E>| {
      let handler = handler.clone();
      source.run(move |result| {
        completion(Ok(result.unwrap_or_else(|error| (*handler)(error))));
      });
    })
  }

  /// Keep only successes passing `predicate`; a rejected value completes
  /// as the failure produced by `filtered`, so every execution still
  /// completes exactly once.
  pub fn filter(
    &self,
    predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    filtered: impl Fn(T) -> E + Send + Sync + 'static,
  ) -> Future<T, E> {
    let source = self.clone();
    let predicate = Arc::new(predicate);
    let filtered = Arc::new(filtered);
    Future::new(move |completion: Completion<T, E>| {
      let predicate = predicate.clone();
      let filtered = filtered.clone();
      source.run(move |result| {
        completion(match result {
          Ok(value) if (*predicate)(&value) => Ok(value),
          Ok(value) => Err((*filtered)(value)),
          Err(error) => Err(error),
        });
      });
    })
  }

  /// Keep only failures passing `predicate`; a rejected failure is
  /// replaced by the one produced by `filtered`. Successes pass through.
  pub fn filter_error(
    &self,
    predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    filtered: impl Fn(E) -> E + Send + Sync + 'static,
  ) -> Future<T, E> {
    let source = self.clone();
    let predicate = Arc::new(predicate);
    let filtered = Arc::new(filtered);
    Future::new(move |completion: Completion<T, E>| {
      let predicate = predicate.clone();
      let filtered = filtered.clone();
      source.run(move |result| {
        completion(match result {
          Ok(value) => Ok(value),
          Err(error) if (*predicate)(&error) => Err(error),
          Err(error) => Err((*filtered)(error)),
        });
      });
    })
  }

  /// Failure recovery through a new future, turning one failure domain
  /// into another. Successes pass through untouched.
  pub fn when_failure<F>(
    &self,
    transform: impl Fn(E) -> Future<T, F> + Send + Sync + 'static,
  ) -> Future<T, F>
  where
    F: Send + 'static,
  {
    let source = self.clone();
    let transform = Arc::new(transform);
    Future::new(move |completion: Completion<T, F>| {
      let transform = transform.clone();
      source.run(move |result| match result {
        Ok(value) => completion(Ok(value)),
        Err(error) => (*transform)(error).run(completion),
      });
    })
  }

  /// A future of both results: runs the receiver, then `other`, and
  /// produces the pair on joint success or the first-encountered failure.
  pub fn zip<U>(&self, other: &Future<U, E>) -> Future<(T, U), E>
  where
    T: Clone + Sync,
    U: Send + 'static,
  {
    let other = other.clone();
    self.flat_map(move |value| {
      other.map(move |other_value| (value.clone(), other_value))
    })
  }

  /// Side-effecting success tap: `on_success` runs on `scheduler`, and
  /// the original result passes through unchanged.
  pub fn done<S>(
    &self,
    scheduler: S,
    on_success: impl Fn(T) + Send + Sync + 'static,
  ) -> Future<T, E>
  where
    S: Scheduler + Clone + Send + Sync + 'static,
    T: Clone,
  {
    let source = self.clone();
    let on_success = Arc::new(on_success);
    Future::new(move |completion: Completion<T, E>| {
      let scheduler = scheduler.clone();
      let on_success = on_success.clone();
      source.run(move |result| {
        if let Ok(value) = &result {
          let value = value.clone();
          let on_success = on_success.clone();
          scheduler.schedule(Box::new(move || (*on_success)(value)));
        }
        completion(result);
      });
    })
  }

  /// Side-effecting failure tap: `on_failure` runs on `scheduler`, and
  /// the original result passes through unchanged.
  pub fn catch<S>(
    &self,
    scheduler: S,
    on_failure: impl Fn(E) + Send + Sync + 'static,
  ) -> Future<T, E>
  where
    S: Scheduler + Clone + Send + Sync + 'static,
    E: Clone,
  {
    let source = self.clone();
    let on_failure = Arc::new(on_failure);
    Future::new(move |completion: Completion<T, E>| {
      let scheduler = scheduler.clone();
      let on_failure = on_failure.clone();
      source.run(move |result| {
        if let Err(error) = &result {
          let error = error.clone();
          let on_failure = on_failure.clone();
          scheduler.schedule(Box::new(move || (*on_failure)(error)));
        }
        completion(result);
      });
    })
  }

  /// Run the future once and surface its outcome as a fire-once cell.
  pub fn into_observable<S>(&self, scheduler: S) -> Observable<Result<T, E>>
  where
    S: Scheduler + Send + 'static,
  {
    let out = Observable::new(ObservingOptions::ONCE);
    let target = out.clone();
    self.execute(scheduler, move |result| target.update(result));
    out
  }
}

#[cfg(test)]
mod test {
  use crate::{lock::Lock, prelude::*};
  use std::sync::mpsc::channel;

  #[derive(Clone, Debug, PartialEq)]
  struct Broken(&'static str);

  fn outcome<T, E>(future: &Future<T, E>) -> Result<T, E>
  where
    T: Send + 'static,
    E: Send + 'static,
  {
    let (sender, receiver) = channel();
    future.run(move |result| sender.send(result).unwrap());
    receiver.recv().unwrap()
  }

  #[test]
  fn ready_futures_complete_immediately() {
    assert_eq!(outcome(&Future::<i32, Broken>::ok(83)), Ok(83));
    assert_eq!(
      outcome(&Future::<i32, Broken>::err(Broken("boom"))),
      Err(Broken("boom"))
    );
  }

  #[test]
  fn map_transforms_only_successes() {
    let doubled = Future::<i32, Broken>::ok(21).map(|v| v * 2);
    assert_eq!(outcome(&doubled), Ok(42));
    let failed = Future::<i32, Broken>::err(Broken("boom")).map(|v| v * 2);
    assert_eq!(outcome(&failed), Err(Broken("boom")));
  }

  #[test]
  fn try_map_converts_transform_failures() {
    let parsed = Future::<String, Broken>::ok(String::from("7"))
      .try_map(|s| s.parse::<i32>(), |_| Broken("not a number"));
    assert_eq!(outcome(&parsed), Ok(7));
    let unparsed = Future::<String, Broken>::ok(String::from("x"))
      .try_map(|s| s.parse::<i32>(), |_| Broken("not a number"));
    assert_eq!(outcome(&unparsed), Err(Broken("not a number")));
  }

  #[test]
  fn flat_map_chains_dependent_futures() {
    let chained = Future::<i32, Broken>::ok(83)
      .flat_map(|id| Future::ok(format!("user {id}")));
    assert_eq!(outcome(&chained), Ok(String::from("user 83")));
  }

  #[test]
  fn and_then_short_circuits_on_failure() {
    let calls = Lock::own(0usize);
    let c = calls.clone();
    let chained = Future::<i32, Broken>::err(Broken("boom"))
      .and_then(move |v| {
        c.with(|n| *n += 1);
        Future::ok(v + 1)
      });
    assert_eq!(outcome(&chained), Err(Broken("boom")));
    assert_eq!(calls.with(|n| *n), 0);
  }

  #[test]
  fn recover_neutralizes_failure() {
    let recovered =
      Future::<i32, Broken>::err(Broken("boom")).recover(|_| 0);
    assert_eq!(outcome(&recovered), Ok(0));
  }

  #[test]
  fn filter_reports_rejections_as_failures() {
    let kept =
      Future::<i32, Broken>::ok(4).filter(|v| v % 2 == 0, |_| Broken("odd"));
    assert_eq!(outcome(&kept), Ok(4));
    let rejected =
      Future::<i32, Broken>::ok(3).filter(|v| v % 2 == 0, |_| Broken("odd"));
    assert_eq!(outcome(&rejected), Err(Broken("odd")));
  }

  #[test]
  fn filter_error_replaces_unexpected_failures() {
    let expected = Future::<i32, Broken>::err(Broken("expected"))
      .filter_error(|e| e.0 == "expected", |_| Broken("unexpected"));
    assert_eq!(outcome(&expected), Err(Broken("expected")));
    let unexpected = Future::<i32, Broken>::err(Broken("surprise"))
      .filter_error(|e| e.0 == "expected", |_| Broken("unexpected"));
    assert_eq!(outcome(&unexpected), Err(Broken("unexpected")));
  }

  #[test]
  fn when_failure_switches_failure_domain() {
    let recovered = Future::<i32, Broken>::err(Broken("boom"))
      .when_failure(|_| Future::<i32, String>::ok(7));
    assert_eq!(outcome(&recovered), Ok(7));
  }

  #[test]
  fn zip_pairs_joint_successes() {
    let zipped =
      Future::<i32, Broken>::ok(1).zip(&Future::<i32, Broken>::ok(2));
    assert_eq!(outcome(&zipped), Ok((1, 2)));
    let failed = Future::<i32, Broken>::err(Broken("boom"))
      .zip(&Future::<i32, Broken>::ok(2));
    assert_eq!(outcome(&failed), Err(Broken("boom")));
  }

  #[test]
  fn executing_twice_runs_the_operation_twice() {
    let runs = Lock::own(0usize);
    let r = runs.clone();
    let future = Future::<i32, Broken>::new(move |completion| {
      r.with(|n| *n += 1);
      completion(Ok(1));
    });
    assert_eq!(outcome(&future), Ok(1));
    assert_eq!(outcome(&future), Ok(1));
    assert_eq!(runs.with(|n| *n), 2);
  }

  #[test]
  fn execute_marshals_through_the_scheduler() {
    let (sender, receiver) = channel();
    Future::<i32, Broken>::ok(5).execute(NewThreadScheduler, move |result| {
      sender.send(result).unwrap();
    });
    assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok(Ok(5)));
  }

  #[test]
  fn execute_split_routes_branches() {
    let (sender, receiver) = channel();
    Future::<i32, Broken>::err(Broken("boom")).execute_split(
      ImmediateScheduler,
      |_| panic!("success branch must not run"),
      move |error| sender.send(error).unwrap(),
    );
    assert_eq!(receiver.recv().unwrap(), Broken("boom"));
  }

  #[test]
  fn taps_pass_the_result_through() {
    let seen = Lock::own(Vec::new());
    let s = seen.clone();
    let tapped = Future::<i32, Broken>::ok(3)
      .done(ImmediateScheduler, move |v| s.with(|list| list.push(v)));
    assert_eq!(outcome(&tapped), Ok(3));
    assert_eq!(seen.with(|list| list.clone()), vec![3]);

    let errors = Lock::own(Vec::new());
    let e = errors.clone();
    let caught = Future::<i32, Broken>::err(Broken("boom"))
      .catch(ImmediateScheduler, move |err| {
        e.with(|list| list.push(err))
      });
    assert_eq!(outcome(&caught), Err(Broken("boom")));
    assert_eq!(errors.with(|list| list.clone()), vec![Broken("boom")]);
  }

  #[test]
  fn into_observable_surfaces_the_outcome_once() {
    let cell = Future::<i32, Broken>::ok(9)
      .into_observable(ImmediateScheduler);
    assert_eq!(cell.value(), Some(Ok(9)));
    assert_eq!(cell.peek(), Some(9));
  }
}
