use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The part of taxable income that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketAllocation {
    /// Label of the bracket the amount was taxed in.
    pub bracket: String,
    pub rate: Decimal,
    pub amount_taxed: Decimal,
    pub tax_owed: Decimal,
}
