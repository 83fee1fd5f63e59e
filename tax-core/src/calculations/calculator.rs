//! End-to-end tax calculation for one annual gross income.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Gross income (annual) |
//! | 2    | Deductions: mortgage, pension, rent, insurance |
//! | 3    | Taxable income = max(0, line 1 - line 2) |
//! | 4    | Tax apportioned across the brackets |
//! | 5    | Net income = line 1 - line 4 |
//! | 6    | Effective rate = line 4 / line 1 × 100 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxCalculator;
//! use tax_core::{DeductionRules, TaxTable};
//!
//! let table = TaxTable::standard();
//! let rules = DeductionRules::standard();
//! let result = TaxCalculator::new(&table, &rules).calculate_tax(dec!(5000000));
//!
//! assert_eq!(result.total_deductions, dec!(1700000));
//! assert_eq!(result.taxable_income, dec!(3300000));
//! assert_eq!(result.total_tax, dec!(383999.82));
//! assert_eq!(result.net_income, dec!(4616000.18));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::apportion::BracketApportioner;
use crate::calculations::common::max;
use crate::calculations::deductions::DeductionCalculator;
use crate::models::{DeductionRules, DeductionSet, TaxResult, TaxTable};

const PERCENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    table: &'a TaxTable,
    rules: &'a DeductionRules,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(
        table: &'a TaxTable,
        rules: &'a DeductionRules,
    ) -> Self {
        Self { table, rules }
    }

    pub fn calculate_deductions(
        &self,
        annual_gross_income: Decimal,
    ) -> DeductionSet {
        DeductionCalculator::new(self.rules).compute(annual_gross_income)
    }

    /// Runs the whole pipeline. Never fails for non-negative input; a zero
    /// income yields zero tax and an empty breakdown.
    pub fn calculate_tax(
        &self,
        annual_gross_income: Decimal,
    ) -> TaxResult {
        let deductions = self.calculate_deductions(annual_gross_income);
        let total_deductions = deductions.total();
        let taxable_income = self.taxable_income(annual_gross_income, total_deductions);

        let apportionment = BracketApportioner::new(self.table).apportion(taxable_income);
        let total_tax = apportionment.total_tax;

        let net_income = annual_gross_income - total_tax;
        let effective_rate = self.effective_rate(annual_gross_income, total_tax);

        debug!(
            gross = %annual_gross_income,
            taxable = %taxable_income,
            tax = %total_tax,
            "calculated tax"
        );

        TaxResult {
            gross_income: annual_gross_income,
            deductions,
            total_deductions,
            taxable_income,
            breakdown: apportionment.breakdown,
            total_tax,
            net_income,
            effective_rate,
        }
    }

    fn taxable_income(
        &self,
        gross: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(gross - total_deductions, Decimal::ZERO)
    }

    fn effective_rate(
        &self,
        gross: Decimal,
        total_tax: Decimal,
    ) -> Decimal {
        if gross.is_zero() {
            return Decimal::ZERO;
        }
        total_tax / gross * PERCENT
    }
}

/// [`TaxCalculator::calculate_deductions`] with the standard rules.
pub fn calculate_deductions(annual_gross_income: Decimal) -> DeductionSet {
    DeductionCalculator::new(&DeductionRules::standard()).compute(annual_gross_income)
}

/// [`TaxCalculator::calculate_tax`] with the standard table and rules.
pub fn calculate_tax(annual_gross_income: Decimal) -> TaxResult {
    let table = TaxTable::standard();
    let rules = DeductionRules::standard();
    TaxCalculator::new(&table, &rules).calculate_tax(annual_gross_income)
}
