//! Estimator state between the user's input and the calculator.
//!
//! The entered income is kept in the period the user typed it in. Switching
//! that period converts the entered value; the view period only changes how
//! the annual result is presented.

use rust_decimal::Decimal;
use tax_core::calculations::{PeriodError, PeriodProjector, TaxCalculator};
use tax_core::{Period, TaxResult};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EstimatorState {
    /// Income as entered, in `input_period` terms.
    pub entered: Decimal,
    pub input_period: Period,
    pub view_period: Period,
}

impl EstimatorState {
    pub fn new(
        entered: Decimal,
        input_period: Period,
    ) -> Self {
        Self {
            entered,
            input_period,
            view_period: input_period,
        }
    }

    pub fn with_view(
        mut self,
        view_period: Period,
    ) -> Self {
        self.view_period = view_period;
        self
    }

    /// Switch the input period, converting the entered value so it keeps
    /// describing the same income. On error the state is left unchanged.
    pub fn set_input_period(
        &mut self,
        period: Period,
    ) -> Result<(), PeriodError> {
        if period == self.input_period {
            return Ok(());
        }
        let converted = PeriodProjector::convert_entered(self.entered, self.input_period, period)?;
        debug!(from = %self.input_period, to = %period, %converted, "switched input period");
        self.entered = converted;
        self.input_period = period;
        Ok(())
    }

    pub fn set_view_period(
        &mut self,
        period: Period,
    ) {
        self.view_period = period;
    }

    /// The annual gross income handed to the calculator.
    pub fn annual_gross(&self) -> Result<Decimal, PeriodError> {
        PeriodProjector::annualize(self.entered, self.input_period)
    }

    pub fn calculate(
        &self,
        calculator: &TaxCalculator<'_>,
    ) -> Result<TaxResult, PeriodError> {
        Ok(calculator.calculate_tax(self.annual_gross()?))
    }
}
