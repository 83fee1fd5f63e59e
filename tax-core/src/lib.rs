pub mod calculations;
pub mod counter;
pub mod models;

pub use calculations::{calculate_deductions, calculate_tax};
pub use counter::{CounterError, CounterStore, VisitCounter};
pub use models::*;
