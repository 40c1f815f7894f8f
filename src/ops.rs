//! Combinators deriving new observables from existing ones.
//!
//! Every combinator subscribes to its source(s) and pushes derived values
//! into an internally owned output cell; the sources keep the chain alive
//! through the callbacks they own.

pub mod combine_latest;
pub mod debounce;
pub mod delay;
pub mod filter;
pub mod flat_map;
pub mod map;
pub mod merge;
pub mod then;
pub mod wait;

pub use wait::WaitError;
