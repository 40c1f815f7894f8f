//! The capability set unifying manually-driven cells, derived
//! combinators and producer facades under one interface for binding.

use crate::{
  context::ExecutionContext, observable::Observable,
  subscription::SubscriptionToken,
};
use std::sync::Arc;

/// Capability: can be driven with new values.
pub trait Push<T>: Send + Sync {
  fn push(&self, value: T);
}

/// Capability: can be subscribed to.
pub trait Observe<T>: Send + Sync {
  fn observe(
    &self,
    observer: Box<dyn FnMut(&T) + Send>,
  ) -> SubscriptionToken;
}

/// A subject is anything that can both be observed and driven.
pub trait Subject<T>: Push<T> + Observe<T> {}

impl<T, S: Push<T> + Observe<T>> Subject<T> for S {}

impl<T: Send + 'static> Push<T> for Observable<T> {
  fn push(&self, value: T) { self.update(value); }
}

impl<T: Send + 'static> Observe<T> for Observable<T> {
  fn observe(
    &self,
    observer: Box<dyn FnMut(&T) + Send>,
  ) -> SubscriptionToken {
    self.subscribe_boxed(observer)
  }
}

/// A push-only producer facade: a recipe that drives whatever observable
/// it is asked to feed.
///
/// ```
/// use rxcell::prelude::*;
///
/// let countdown = Signal::new(|cell: Observable<i32>| {
///   for i in (0..3).rev() {
///     cell.update(i);
///   }
/// });
/// let output = Observable::new(ObservingOptions::default());
/// countdown.feed(&output);
/// assert_eq!(output.value(), Some(0));
/// ```
pub struct Signal<T> {
  producer: Arc<dyn Fn(Observable<T>) + Send + Sync>,
}

impl<T> Clone for Signal<T> {
  fn clone(&self) -> Self { Signal { producer: self.producer.clone() } }
}

impl<T: Send + 'static> Signal<T> {
  pub fn new(producer: impl Fn(Observable<T>) + Send + Sync + 'static) -> Self {
    Signal { producer: Arc::new(producer) }
  }

  /// Wire the producer to `target`. The producer decides when and how
  /// often to push.
  pub fn feed(&self, target: &Observable<T>) {
    (*self.producer)(target.clone());
  }
}

/// Receives a continuous one-way feed from something observable.
pub trait Bindable<T> {
  fn bind(&self, source: &dyn Observe<T>) -> SubscriptionToken;
}

impl<T: Clone + Send + 'static> Bindable<T> for Observable<T> {
  fn bind(&self, source: &dyn Observe<T>) -> SubscriptionToken {
    let target = self.clone();
    source.observe(Box::new(move |value: &T| target.update(value.clone())))
  }
}

/// Bind two cells to each other: each side follows the other through one
/// shared non-recursive [`ExecutionContext`], which swallows the feedback
/// echo instead of deadlocking.
///
/// At bind time `left`'s retained value (if any) seeds `right`. The two
/// cells keep each other alive through their callbacks until one side
/// unsubscribes with the returned tokens.
pub fn bind_bidirectional<T: Clone + Send + 'static>(
  left: &Observable<T>,
  right: &Observable<T>,
) -> (SubscriptionToken, SubscriptionToken) {
  let context = ExecutionContext::non_recursive();
  let forward = {
    let context = context.clone();
    let right = right.clone();
    left.subscribe(move |value| {
      context.execute(|| right.update(value.clone()));
    })
  };
  let backward = {
    let left = left.clone();
    right.subscribe(move |value| {
      context.execute(|| left.update(value.clone()));
    })
  };
  (forward, backward)
}
