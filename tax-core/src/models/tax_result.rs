use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BracketAllocation, DeductionSet};

/// Outcome of one tax calculation. Every monetary field is annual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub deductions: DeductionSet,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub breakdown: Vec<BracketAllocation>,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    /// Total tax as a percentage of gross income.
    pub effective_rate: Decimal,
}
