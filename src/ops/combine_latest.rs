use crate::{
  lock::Lock,
  observable::{Observable, ObservingOptions},
};
use std::sync::Arc;

impl<T: Clone + Send + 'static> Observable<T> {
  /// Join two differently-typed observables: whenever either source
  /// updates, the corresponding slot of a private two-slot buffer is
  /// filled, and once both slots hold a value, `combine` produces an
  /// emission from the latest pair.
  ///
  /// Nothing is emitted until both sources have delivered at least once.
  /// Updates racing in from both sources are linearized by the buffer's
  /// lock: the run-to-run interleaving is not guaranteed, but deliveries
  /// never tear.
  pub fn combine_latest<U, V>(
    &self,
    other: &Observable<U>,
    combine: impl Fn(&T, &U) -> V + Send + Sync + 'static,
  ) -> Observable<V>
  where
    U: Clone + Send + 'static,
    V: Send + 'static,
  {
    let out = Observable::new(ObservingOptions::default());
    let slots: Arc<Lock<(Option<T>, Option<U>)>> = Lock::own((None, None));
    let combine = Arc::new(combine);
    {
      let target = out.clone();
      let slots = slots.clone();
      let combine = combine.clone();
      self.subscribe(move |value| {
        slots.with(|slots| {
          slots.0 = Some(value.clone());
          if let (Some(mine), Some(theirs)) = (&slots.0, &slots.1) {
            target.update((*combine)(mine, theirs));
          }
        });
      });
    }
    {
      let target = out.clone();
      other.subscribe(move |value| {
        slots.with(|slots| {
          slots.1 = Some(value.clone());
          if let (Some(mine), Some(theirs)) = (&slots.0, &slots.1) {
            target.update((*combine)(mine, theirs));
          }
        });
      });
    }
    out
  }

  /// [`combine_latest`](Self::combine_latest) specialized to tupling.
  pub fn zip<U>(&self, other: &Observable<U>) -> Observable<(T, U)>
  where
    U: Clone + Send + 'static,
  {
    self.combine_latest(other, |mine, theirs| (mine.clone(), theirs.clone()))
  }
}

#[cfg(test)]
mod test {
  use crate::{lock::Lock, prelude::*};
  use float_cmp::approx_eq;

  #[test]
  fn emits_nothing_until_both_sides_delivered() {
    let received = Lock::own(Vec::new());
    let ints: Observable<i32> = Observable::new(ObservingOptions::default());
    let floats = Observable::of(1.0_f64);
    let combined =
      ints.combine_latest(&floats, |i, f| format!("{i} and {f}"));
    let r = received.clone();
    combined.subscribe(move |s: &String| r.with(|list| list.push(s.clone())));
    assert!(received.with(|list| list.is_empty()));
    ints.update(2);
    assert_eq!(
      received.with(|list| list.clone()),
      vec![String::from("2 and 1")]
    );
    ints.update(5);
    assert_eq!(
      received.with(|list| list.clone()),
      vec![String::from("2 and 1"), String::from("5 and 1")]
    );
  }

  #[test]
  fn reemits_with_latest_from_the_other_side() {
    let ints = Observable::of(2);
    let floats = Observable::of(1.0_f64);
    let combined = ints.combine_latest(&floats, |i, f| *i as f64 + f);
    assert!(approx_eq!(f64, combined.value().unwrap(), 3.0));
    floats.update(0.5);
    assert!(approx_eq!(f64, combined.value().unwrap(), 2.5));
  }

  #[test]
  fn zip_produces_latest_tuples() {
    let received = Lock::own(Vec::new());
    let numbers = Observable::new(ObservingOptions::default());
    let labels = Observable::new(ObservingOptions::default());
    let zipped = numbers.zip(&labels);
    let r = received.clone();
    zipped.subscribe(move |pair: &(i32, char)| r.with(|list| list.push(*pair)));
    numbers.update(1);
    labels.update('a');
    numbers.update(2);
    assert_eq!(received.with(|list| list.clone()), vec![(1, 'a'), (2, 'a')]);
  }
}
