mod bracket_allocation;
mod deduction_rules;
mod deduction_set;
mod period;
mod tax_bracket;
mod tax_result;
mod tax_table;

pub use bracket_allocation::BracketAllocation;
pub use deduction_rules::{DeductionRules, ZeroIncomeDeductions};
pub use deduction_set::DeductionSet;
pub use period::Period;
pub use tax_bracket::TaxBracket;
pub use tax_result::TaxResult;
pub use tax_table::{TaxTable, TaxTableError};
