use crate::{
  lock::Lock,
  scheduler::Scheduler,
  subscription::{SubscriptionToken, Unsubscribable},
};
use bitflags::bitflags;
use smallvec::SmallVec;
use std::sync::{Arc, Weak};
use tracing::trace;

bitflags! {
  /// Options controlling a cell's retention and one-shot semantics.
  #[derive(Clone, Copy, Debug, PartialEq, Eq)]
  pub struct ObservingOptions: u8 {
    /// The last value is never stored: `value()` is always `None` and late
    /// subscribers get nothing (push-only semantics).
    ///
    /// Non-retaining observables cannot be merged.
    const NO_RETAIN = 0b0001;
    /// Deliver at most once to each subscriber, then clear the subscriber
    /// registry. Use this to resolve ownership cycles for one-off
    /// operations.
    const ONCE = 0b0010;
  }
}

impl Default for ObservingOptions {
  /// Retain the last value, deliver on every update.
  fn default() -> Self { ObservingOptions::empty() }
}

type BoxObserver<T> = Box<dyn FnMut(&T) + Send>;

struct Registry<T> {
  value: Option<T>,
  observers: SmallVec<[(usize, BoxObserver<T>); 2]>,
  next_id: usize,
}

pub(crate) struct RawCell<T> {
  state: Lock<Registry<T>>,
  options: ObservingOptions,
}

impl<T: Send + 'static> Unsubscribable for RawCell<T> {
  fn unsubscribe_id(&self, id: usize) {
    self.state.with(|state| {
      state.observers.retain(|(observer_id, _)| *observer_id != id);
    });
    trace!(id, "unsubscribed");
  }
}

/// An `Observable<T>` is a value that changes over time.
///
/// ```
/// use rxcell::prelude::*;
///
/// let text = Observable::of(String::from("World"));
/// text.subscribe(|s| println!("Hello {s}")); // prints "Hello World"
/// text.update(String::from("Developer")); // prints "Hello Developer"
/// ```
///
/// Observables are thread safe: `subscribe`, `update` and `unsubscribe`
/// may be called from any thread and serialize through one per-cell lock.
/// Subscriber callbacks run *while that lock is held*; a callback must not
/// call back into the same cell (`subscribe`/`update`/`unsubscribe`), or it
/// deadlocks. See [`ExecutionContext::non_recursive`] for the bidirectional
/// binding case.
///
/// Cloning an `Observable` clones a handle to the same cell.
///
/// [`ExecutionContext::non_recursive`]: crate::context::ExecutionContext::non_recursive
pub struct Observable<T> {
  cell: Arc<RawCell<T>>,
}

impl<T> Clone for Observable<T> {
  fn clone(&self) -> Self { Observable { cell: self.cell.clone() } }
}

impl<T: Send + 'static> Default for Observable<T> {
  fn default() -> Self { Self::new(ObservingOptions::default()) }
}

impl<T: Send + 'static> Observable<T> {
  /// Create a new observable without a value. Supply one later via
  /// [`update`](Self::update).
  pub fn new(options: ObservingOptions) -> Self {
    Observable {
      cell: Arc::new(RawCell {
        state: Lock::new(Registry {
          value: None,
          observers: SmallVec::new(),
          next_id: 0,
        }),
        options,
      }),
    }
  }

  /// Create a retaining observable holding `value`.
  pub fn of(value: T) -> Self {
    Self::with_value(value, ObservingOptions::default())
  }

  /// Create an observable from an initial value and options. If the
  /// options contain [`ObservingOptions::NO_RETAIN`] the initial value is
  /// discarded and the cell behaves as if never updated.
  pub fn with_value(value: T, options: ObservingOptions) -> Self {
    let observable = Self::new(options);
    if !options.contains(ObservingOptions::NO_RETAIN) {
      observable.cell.state.with(|state| state.value = Some(value));
    }
    observable
  }

  /// Create an observable and hand it to `producer` before returning it:
  ///
  /// ```
  /// use rxcell::prelude::*;
  ///
  /// let magic = Observable::create(ObservingOptions::default(), |cell| {
  ///   cell.update(42);
  /// });
  /// assert_eq!(magic.value(), Some(42));
  /// ```
  pub fn create(
    options: ObservingOptions,
    producer: impl FnOnce(&Observable<T>),
  ) -> Self {
    let observable = Self::new(options);
    producer(&observable);
    observable
  }

  /// A fire-once observable whose value is delivered from `scheduler`.
  pub fn once_on<S>(scheduler: &S, value: T) -> Self
  where
    S: Scheduler + ?Sized,
  {
    let observable = Self::new(ObservingOptions::ONCE);
    let cell = observable.clone();
    scheduler.schedule(Box::new(move || cell.update(value)));
    observable
  }

  pub fn options(&self) -> ObservingOptions { self.cell.options }

  /// The last delivered value, or `None` if the cell was never updated or
  /// does not retain values.
  pub fn value(&self) -> Option<T>
  where
    T: Clone,
  {
    self.cell.state.with(|state| state.value.clone())
  }

  /// Subscribe to current and future values of this observable.
  ///
  /// If the cell retains a value, `observer` is invoked with it
  /// synchronously before this call returns (replay-latest). The returned
  /// token can be used to unsubscribe; the callback is retained by the
  /// cell until then, or until the cell is dropped.
  pub fn subscribe(
    &self,
    observer: impl FnMut(&T) + Send + 'static,
  ) -> SubscriptionToken {
    self.subscribe_boxed(Box::new(observer))
  }

  pub(crate) fn subscribe_boxed(
    &self,
    mut observer: BoxObserver<T>,
  ) -> SubscriptionToken {
    let options = self.cell.options;
    let id = self.cell.state.with(|state| {
      let id = state.next_id;
      state.next_id += 1;
      if let Some(value) = state.value.as_ref() {
        observer(value);
      }
      // A fired once-cell never delivers again; replay above was all this
      // subscriber will ever see, so don't register it.
      let spent =
        options.contains(ObservingOptions::ONCE) && state.value.is_some();
      if !spent {
        state.observers.push((id, observer));
      }
      id
    });
    trace!(id, "subscribed");
    let cell: Arc<dyn Unsubscribable> = self.cell.clone();
    let owner: Weak<dyn Unsubscribable> = Arc::downgrade(&cell);
    SubscriptionToken::new(id, owner)
  }

  /// Update the cell and notify every registered subscriber, in
  /// registration order, before returning. Concurrent updates on the same
  /// cell are fully serialized.
  pub fn update(&self, value: T) {
    let options = self.cell.options;
    self.cell.state.with(|state| {
      trace!(observers = state.observers.len(), "update");
      for (_, observer) in state.observers.iter_mut() {
        observer(&value);
      }
      // Once-cells clear after the *full* fan-out, so every subscriber
      // present at call entry got exactly one delivery.
      if options.contains(ObservingOptions::ONCE) {
        state.observers.clear();
      }
      if !options.contains(ObservingOptions::NO_RETAIN) {
        state.value = Some(value);
      }
    });
  }

  /// Pipe every update of `source` into this cell.
  pub fn follow(&self, source: &Observable<T>) -> SubscriptionToken
  where
    T: Clone,
  {
    let target = self.clone();
    source.subscribe(move |value| target.update(value.clone()))
  }

  /// Unsubscribe with a token obtained from [`subscribe`](Self::subscribe).
  /// Also releases the observer callback. Idempotent.
  ///
  /// Only *future* deliveries are guaranteed to stop: a fan-out already
  /// in flight on another thread may invoke the callback one last time.
  pub fn unsubscribe(&self, token: &SubscriptionToken) {
    self.cell.unsubscribe_id(token.id());
  }

  /// Merge multiple observables of the same type:
  ///
  /// ```
  /// use rxcell::prelude::*;
  ///
  /// let greeting = Observable::merge_all(
  ///   &[Observable::of("Hello"), Observable::of("World")],
  ///   ObservingOptions::default(),
  /// );
  /// assert_eq!(greeting.value(), Some(vec!["Hello", "World"]));
  /// ```
  ///
  /// The merged cell re-emits the full ordered list of latest values each
  /// time any input updates, and emits nothing until every input has
  /// delivered at least one value.
  ///
  /// # Panics
  ///
  /// Panics if any input has [`ObservingOptions::NO_RETAIN`]: push-only
  /// observables do not support merging.
  pub fn merge_all(
    sources: &[Observable<T>],
    options: ObservingOptions,
  ) -> Observable<Vec<T>>
  where
    T: Clone,
  {
    let merged = Observable::new(options);
    let slots: Arc<Lock<Vec<Option<T>>>> =
      Lock::own(sources.iter().map(|_| None).collect());
    for (index, source) in sources.iter().enumerate() {
      assert!(
        !source.options().contains(ObservingOptions::NO_RETAIN),
        "push-only observables do not support merging"
      );
      // One private snapshot-subscriber per source keeps the merge
      // plumbing out of the sources' external subscriber lists.
      let copy = source.map(|value| value.clone());
      let slots = slots.clone();
      let merged = merged.clone();
      copy.subscribe(move |value| {
        slots.with(|slots| {
          slots[index] = Some(value.clone());
          let values: Vec<T> =
            slots.iter().filter_map(|slot| slot.clone()).collect();
          if values.len() == slots.len() {
            merged.update(values);
          }
        });
      });
    }
    merged
  }
}
