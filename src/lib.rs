//! # rxcell: observable value cells and chainable futures
//!
//! A small reactive toolkit around two ideas: an [`Observable`] — a
//! thread-safe, mutable value cell that fans every update out to its
//! subscribers — and a [`Future`] — a reusable recipe for one
//! asynchronous, possibly-failing computation.
//!
//! ## Quick start
//!
//! ```rust
//! use rxcell::prelude::*;
//!
//! let numbers: Observable<i32> = Observable::new(ObservingOptions::default());
//! let doubled_evens = numbers.filter(|v| v % 2 == 0).map(|v| v * 2);
//! doubled_evens.subscribe(|v| println!("{v}"));
//!
//! for i in 1..=6 {
//!   numbers.update(i); // prints 4, 8, 12
//! }
//! ```
//!
//! ## Key concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Mutable observable value cell; combinators derive new cells |
//! | [`SubscriptionToken`] | Handle to cancel an active subscription |
//! | [`Future`] | Deferred computation chained with `map`/`flat_map`/`recover`/… |
//! | [`Scheduler`] | Host-supplied "run now / run later" capability |
//! | [`Signal`] | Push-only producer facade for binding |
//!
//! ## Threading
//!
//! Cell operations are synchronous and may be called from any thread;
//! each cell serializes through its own lock, and subscriber callbacks
//! run while that lock is held. A callback must therefore never call back
//! into the cell it subscribed to. The crate owns no threads: everything
//! time- or thread-related goes through an explicit [`Scheduler`].
//!
//! [`Observable`]: observable::Observable
//! [`SubscriptionToken`]: subscription::SubscriptionToken
//! [`Future`]: future::Future
//! [`Scheduler`]: scheduler::Scheduler
//! [`Signal`]: subject::Signal

pub mod context;
pub mod future;
pub mod lock;
pub mod observable;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use prelude::*;

pub use crate::scheduler::{Duration, Instant};
