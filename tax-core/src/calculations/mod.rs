//! Tax calculation logic: deductions, bracket apportionment, result
//! aggregation and the annual/monthly projection used for display.

pub mod apportion;
pub mod calculator;
pub mod common;
pub mod deductions;
pub mod period;

pub use apportion::{Apportionment, BracketApportioner};
pub use calculator::{TaxCalculator, calculate_deductions, calculate_tax};
pub use deductions::DeductionCalculator;
pub use period::{PeriodError, PeriodProjector, ProjectedTaxResult};
