//! Annual/monthly presentation of figures that are always computed annually.
//!
//! Two different conversions exist:
//!
//! * projection of a computed annual figure into the view period, which
//!   divides by 12 and leaves rounding to the formatter, and
//! * conversion of a value the user already typed when they switch the
//!   input period. Going to monthly rounds to a whole unit; going to annual
//!   multiplies by 12 without rounding. A monthly value whose annual
//!   figure does not fit in a `Decimal` is an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_whole;
use crate::models::{BracketAllocation, DeductionSet, Period, TaxResult};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("monthly amount {0} is too large to express per year")]
    AnnualOverflow(Decimal),
}

/// A [`TaxResult`] with every monetary field expressed in `period` terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedTaxResult {
    pub period: Period,
    pub gross_income: Decimal,
    pub deductions: DeductionSet,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub breakdown: Vec<BracketAllocation>,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub effective_rate: Decimal,
}

pub struct PeriodProjector;

impl PeriodProjector {
    /// Expresses an annual amount in `period` terms.
    pub fn project(
        annual_amount: Decimal,
        period: Period,
    ) -> Decimal {
        match period {
            Period::Annual => annual_amount,
            Period::Monthly => annual_amount / MONTHS_PER_YEAR,
        }
    }

    pub fn project_result(
        result: &TaxResult,
        period: Period,
    ) -> ProjectedTaxResult {
        let project = |amount| Self::project(amount, period);

        ProjectedTaxResult {
            period,
            gross_income: project(result.gross_income),
            deductions: result.deductions.map(project),
            total_deductions: project(result.total_deductions),
            taxable_income: project(result.taxable_income),
            breakdown: result
                .breakdown
                .iter()
                .map(|allocation| BracketAllocation {
                    bracket: allocation.bracket.clone(),
                    rate: allocation.rate,
                    amount_taxed: project(allocation.amount_taxed),
                    tax_owed: project(allocation.tax_owed),
                })
                .collect(),
            total_tax: project(result.total_tax),
            net_income: project(result.net_income),
            effective_rate: result.effective_rate,
        }
    }

    pub fn monthly_from_annual(annual_value: Decimal) -> Decimal {
        round_whole(annual_value / MONTHS_PER_YEAR)
    }

    pub fn annual_from_monthly(monthly_value: Decimal) -> Result<Decimal, PeriodError> {
        monthly_value
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(PeriodError::AnnualOverflow(monthly_value))
    }

    /// Converts a value the user entered in `from` terms into `to` terms.
    pub fn convert_entered(
        value: Decimal,
        from: Period,
        to: Period,
    ) -> Result<Decimal, PeriodError> {
        match (from, to) {
            (Period::Annual, Period::Monthly) => Ok(Self::monthly_from_annual(value)),
            (Period::Monthly, Period::Annual) => Self::annual_from_monthly(value),
            _ => Ok(value),
        }
    }

    /// Normalizes an entered value to the annual figure the calculator needs.
    pub fn annualize(
        value: Decimal,
        entered_in: Period,
    ) -> Result<Decimal, PeriodError> {
        match entered_in {
            Period::Annual => Ok(value),
            Period::Monthly => Self::annual_from_monthly(value),
        }
    }
}
