use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
  /// On each source update, subscribe to the cell returned by `transform`
  /// and forward *its* updates.
  ///
  /// Two properties to be aware of:
  /// - subscriptions to previously returned inner cells are not torn
  ///   down; an old inner cell that updates again still forwards.
  /// - the subscription does not keep the inner cell alive. A cell
  ///   created inside `transform` and owned by nobody else only
  ///   contributes the values it delivers synchronously (its retained
  ///   value, replayed on subscribe).
  pub fn flat_map<U>(
    &self,
    transform: impl Fn(&T) -> Observable<U> + Send + 'static,
  ) -> Observable<U>
  where
    U: Clone + Send + 'static,
  {
    let out = Observable::new(self.options());
    let target = out.clone();
    self.subscribe(move |value| {
      let target = target.clone();
      transform(value)
        .subscribe(move |inner_value| target.update(inner_value.clone()));
    });
    out
  }
}

#[cfg(test)]
mod test {
  use crate::{lock::Lock, prelude::*};

  #[test]
  fn forwards_inner_updates() {
    let received = Lock::own(Vec::new());
    let outer = Observable::new(ObservingOptions::default());
    let inner = Observable::new(ObservingOptions::default());
    let inner_for_transform = inner.clone();
    let flattened = outer.flat_map(move |_: &i32| inner_for_transform.clone());
    let r = received.clone();
    flattened.subscribe(move |v: &i32| r.with(|list| list.push(*v)));
    outer.update(0);
    inner.update(10);
    inner.update(20);
    assert_eq!(received.with(|list| list.clone()), vec![10, 20]);
  }

  #[test]
  fn replays_inner_retained_value() {
    let outer = Observable::new(ObservingOptions::default());
    let flattened = outer.flat_map(|v: &i32| Observable::of(v * 10));
    outer.update(4);
    assert_eq!(flattened.value(), Some(40));
  }

  #[test]
  fn prior_inner_subscriptions_persist() {
    let received = Lock::own(Vec::new());
    let outer = Observable::new(ObservingOptions::default());
    let first = Observable::new(ObservingOptions::default());
    let second = Observable::new(ObservingOptions::default());
    let cells = [first.clone(), second.clone()];
    let flattened = outer.flat_map(move |i: &usize| cells[*i].clone());
    let r = received.clone();
    flattened.subscribe(move |v: &i32| r.with(|list| list.push(*v)));
    outer.update(0);
    outer.update(1);
    // The first inner cell was never unsubscribed from.
    first.update(1);
    second.update(2);
    assert_eq!(received.with(|list| list.clone()), vec![1, 2]);
  }
}
