//! Best-effort visit counter, independent of the tax calculations.
//!
//! Storage is a [`CounterStore`] chosen at startup through a
//! [`CounterStoreRegistry`]; [`VisitCounter`] wraps it and answers with safe
//! defaults whenever the store misbehaves.

pub mod factory;
pub mod noop;
pub mod store;
pub mod visit;

pub use factory::{CounterConfig, CounterStoreFactory, CounterStoreRegistry, DEFAULT_COUNTER_KEY};
pub use noop::{NoopCounterStore, NoopCounterStoreFactory};
pub use store::{CounterError, CounterStore};
pub use visit::{DEFAULT_INCREMENT_TIMEOUT, FALLBACK_INCREMENT, VisitCounter};
