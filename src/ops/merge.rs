use crate::{
  lock::Lock,
  observable::{Observable, ObservingOptions},
};

impl<T: Clone + Send + 'static> Observable<T> {
  /// Fan two same-typed observables into one: the output forwards
  /// whichever source updates.
  ///
  /// Both forwarding paths run under a shared lock, so concurrent updates
  /// from the two sources are serialized rather than interleaved
  /// mid-delivery.
  pub fn merge(&self, other: &Observable<T>) -> Observable<T> {
    let out = Observable::new(ObservingOptions::default());
    let serialize = Lock::own(());
    for source in [self, other] {
      let target = out.clone();
      let serialize = serialize.clone();
      source.subscribe(move |value| {
        serialize.with(|_| target.update(value.clone()));
      });
    }
    out
  }

  /// Pair each update with the latest value from the other cell,
  /// producing tuples.
  ///
  /// # Panics
  ///
  /// Panics if either cell has [`ObservingOptions::NO_RETAIN`]: pairing
  /// feeds on latest values, which push-only observables do not keep.
  pub fn pair<U>(&self, other: &Observable<U>) -> Observable<(T, U)>
  where
    U: Clone + Send + 'static,
  {
    assert!(
      !self.options().contains(ObservingOptions::NO_RETAIN)
        && !other.options().contains(ObservingOptions::NO_RETAIN),
      "push-only observables cannot be paired"
    );
    self.zip(other)
  }
}
