use crate::observable::{Observable, ObservingOptions};

impl<T: Send + 'static> Observable<T> {
  /// Create a new observable receiving only the values for which
  /// `predicate` holds; rejected values are dropped silently, not buffered
  /// and not retried.
  pub fn filter(
    &self,
    predicate: impl Fn(&T) -> bool + Send + 'static,
  ) -> Observable<T>
  where
    T: Clone,
  {
    let out = Observable::new(ObservingOptions::default());
    let target = out.clone();
    self.subscribe(move |value| {
      if predicate(value) {
        target.update(value.clone());
      }
    });
    out
  }
}
