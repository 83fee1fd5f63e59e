use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four statutory reliefs derived from one annual gross income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSet {
    pub mortgage: Decimal,
    pub pension: Decimal,
    pub rent: Decimal,
    pub insurance: Decimal,
}

impl DeductionSet {
    pub fn total(&self) -> Decimal {
        self.mortgage + self.pension + self.rent + self.insurance
    }

    /// Applies `f` to every amount, keeping the category layout.
    pub fn map(
        &self,
        f: impl Fn(Decimal) -> Decimal,
    ) -> Self {
        Self {
            mortgage: f(self.mortgage),
            pension: f(self.pension),
            rent: f(self.rent),
            insurance: f(self.insurance),
        }
    }
}
