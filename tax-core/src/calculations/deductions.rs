//! Statutory deductions derived from annual gross income.
//!
//! | Deduction | Rule                               |
//! |-----------|------------------------------------|
//! | Mortgage  | 10% of gross, uncapped             |
//! | Pension   | 8% of gross, uncapped              |
//! | Rent      | 20% of gross, capped at 500,000    |
//! | Insurance | fixed 300,000                      |

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::{DeductionRules, DeductionSet, ZeroIncomeDeductions};

/// Derives a [`DeductionSet`] from an annual gross income.
#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    rules: &'a DeductionRules,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(rules: &'a DeductionRules) -> Self {
        Self { rules }
    }

    /// Computes the four deductions for `annual_gross_income`.
    ///
    /// The input must be non-negative; parsing and validation belong to the
    /// caller.
    pub fn compute(
        &self,
        annual_gross_income: Decimal,
    ) -> DeductionSet {
        debug_assert!(
            !annual_gross_income.is_sign_negative() || annual_gross_income.is_zero(),
            "gross income must be non-negative"
        );

        if annual_gross_income.is_zero() && self.rules.zero_income == ZeroIncomeDeductions::Waive {
            return DeductionSet::default();
        }

        let deductions = DeductionSet {
            mortgage: self.mortgage(annual_gross_income),
            pension: self.pension(annual_gross_income),
            rent: self.rent(annual_gross_income),
            insurance: self.rules.insurance,
        };
        trace!(gross = %annual_gross_income, total = %deductions.total(), "derived deductions");
        deductions
    }

    fn mortgage(
        &self,
        gross: Decimal,
    ) -> Decimal {
        gross * self.rules.mortgage_rate
    }

    fn pension(
        &self,
        gross: Decimal,
    ) -> Decimal {
        gross * self.rules.pension_rate
    }

    fn rent(
        &self,
        gross: Decimal,
    ) -> Decimal {
        (gross * self.rules.rent_rate).min(self.rules.rent_cap)
    }
}
