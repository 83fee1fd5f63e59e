use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to report as deductions when the gross income is exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroIncomeDeductions {
    /// Keep the fixed insurance relief even with no income.
    #[default]
    Fixed,
    /// Report every deduction as zero.
    Waive,
}

impl ZeroIncomeDeductions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Waive => "waive",
        }
    }
}

impl fmt::Display for ZeroIncomeDeductions {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZeroIncomeDeductions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "waive" => Ok(Self::Waive),
            other => Err(format!(
                "unknown zero-income policy '{other}', expected 'fixed' or 'waive'"
            )),
        }
    }
}

/// Rates, caps and fixed amounts used to derive a [`DeductionSet`].
///
/// [`DeductionSet`]: super::DeductionSet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRules {
    pub mortgage_rate: Decimal,
    pub pension_rate: Decimal,
    pub rent_rate: Decimal,
    pub rent_cap: Decimal,
    pub insurance: Decimal,
    pub zero_income: ZeroIncomeDeductions,
}

impl DeductionRules {
    /// Mortgage 10%, pension 8%, rent 20% capped at 500,000, insurance 300,000.
    pub fn standard() -> Self {
        Self {
            mortgage_rate: Decimal::new(10, 2),
            pension_rate: Decimal::new(8, 2),
            rent_rate: Decimal::new(20, 2),
            rent_cap: Decimal::from(500_000),
            insurance: Decimal::from(300_000),
            zero_income: ZeroIncomeDeductions::Fixed,
        }
    }

    pub fn with_zero_income(
        mut self,
        policy: ZeroIncomeDeductions,
    ) -> Self {
        self.zero_income = policy;
        self
    }
}

impl Default for DeductionRules {
    fn default() -> Self {
        Self::standard()
    }
}
