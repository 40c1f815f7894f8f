//! Prelude re-exporting the commonly used types.
//!
//! `rxcell::prelude::Future` is this crate's callback-based future, not
//! `std::future::Future`.

#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::PoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::{
  context::ExecutionContext,
  future::{Completion, Future},
  lock::Lock,
  observable::{Observable, ObservingOptions},
  ops::WaitError,
  scheduler::{
    Duration, ImmediateScheduler, Instant, NewThreadScheduler, Scheduler,
    Task, TaskHandle, TestScheduler,
  },
  subject::{bind_bidirectional, Bindable, Observe, Push, Signal, Subject},
  subscription::{SubscriptionToken, Unsubscribable},
};
