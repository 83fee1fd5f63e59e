use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::group_thousands;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` marks the open-ended top bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub label: String,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
            label: label.into(),
        }
    }

    /// Number of currency units this bracket can absorb, bounds inclusive.
    /// `None` means unbounded, which includes a span too wide for `Decimal`:
    /// such a bracket absorbs any representable amount.
    pub fn capacity(&self) -> Option<Decimal> {
        let max = self.max_income?;
        max.checked_sub(self.min_income)?.checked_add(Decimal::ONE)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }

    /// Builds a display label from the bounds, e.g. `₦800,001 - ₦3,000,000`.
    pub fn default_label(
        min_income: Decimal,
        max_income: Option<Decimal>,
        currency_symbol: &str,
    ) -> String {
        match max_income {
            Some(max) if min_income.is_zero() => {
                format!("First {currency_symbol}{}", group_thousands(max))
            }
            Some(max) => format!(
                "{currency_symbol}{} - {currency_symbol}{}",
                group_thousands(min_income),
                group_thousands(max)
            ),
            None => match min_income.checked_sub(Decimal::ONE) {
                Some(floor) => format!("Above {currency_symbol}{}", group_thousands(floor)),
                None => format!("From {currency_symbol}{}", group_thousands(min_income)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn capacity_includes_both_bounds() {
        let bracket = TaxBracket::new(dec!(800001), Some(dec!(3000000)), dec!(0.15), "b");

        assert_eq!(bracket.capacity(), Some(dec!(2200000)));
    }

    #[test]
    fn first_bracket_capacity_counts_zero() {
        let bracket = TaxBracket::new(dec!(0), Some(dec!(800000)), dec!(0), "b");

        assert_eq!(bracket.capacity(), Some(dec!(800001)));
    }

    #[test]
    fn capacity_wider_than_decimal_range_is_unbounded() {
        let bracket = TaxBracket::new(Decimal::MIN, Some(Decimal::MAX), dec!(0), "b");
        let full_range = TaxBracket::new(dec!(0), Some(Decimal::MAX), dec!(0), "b");

        assert_eq!(bracket.capacity(), None);
        assert_eq!(full_range.capacity(), None);
    }

    #[test]
    fn capacity_at_the_top_of_the_range_is_exact() {
        let min = Decimal::MAX - dec!(9);
        let bracket = TaxBracket::new(min, Some(Decimal::MAX - dec!(1)), dec!(0), "b");

        assert_eq!(bracket.capacity(), Some(dec!(9)));
    }

    #[test]
    fn top_bracket_has_no_capacity_limit() {
        let bracket = TaxBracket::new(dec!(50000001), None, dec!(0.25), "b");

        assert_eq!(bracket.capacity(), None);
        assert!(bracket.is_unbounded());
    }

    #[test]
    fn default_labels_match_reference_wording() {
        assert_eq!(
            TaxBracket::default_label(dec!(0), Some(dec!(800000)), "₦"),
            "First ₦800,000"
        );
        assert_eq!(
            TaxBracket::default_label(dec!(800001), Some(dec!(3000000)), "₦"),
            "₦800,001 - ₦3,000,000"
        );
        assert_eq!(
            TaxBracket::default_label(dec!(50000001), None, "₦"),
            "Above ₦50,000,000"
        );
    }

    #[test]
    fn unbounded_label_at_the_bottom_of_the_range_names_its_start() {
        assert_eq!(
            TaxBracket::default_label(Decimal::MIN, None, "₦"),
            "From ₦-79,228,162,514,264,337,593,543,950,335"
        );
    }
}
