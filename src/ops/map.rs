use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
  /// Create a new observable with a transform applied:
  ///
  /// ```
  /// use rxcell::prelude::*;
  ///
  /// let text = Observable::of(String::from("Hello World"));
  /// let upper = text.map(|s| s.to_uppercase());
  /// text.update(String::from("yeah!"));
  /// assert_eq!(upper.value(), Some(String::from("YEAH!")));
  /// ```
  ///
  /// The derived cell inherits the source's options. `transform` must not
  /// fail; when it can, use [`try_map`](Self::try_map).
  pub fn map<U>(
    &self,
    transform: impl Fn(&T) -> U + Send + 'static,
  ) -> Observable<U>
  where
    U: Send + 'static,
  {
    let out = Observable::new(self.options());
    let target = out.clone();
    self.subscribe(move |value| target.update(transform(value)));
    out
  }

  /// Map with a fallible transform; each outcome lands in the result
  /// channel of the derived cell.
  pub fn try_map<U, E>(
    &self,
    transform: impl Fn(&T) -> Result<U, E> + Send + 'static,
  ) -> Observable<Result<U, E>>
  where
    U: Send + 'static,
    E: Send + 'static,
  {
    let out = Observable::new(self.options());
    let target = out.clone();
    self.subscribe(move |value| target.update(transform(value)));
    out
  }
}
