//! Progressive apportionment of taxable income across a [`TaxTable`].
//!
//! Each unit of taxable income is taxed at the rate of the bracket it falls
//! in. Brackets are filled in ascending order, each absorbing at most
//! `max_income - min_income + 1` units, and traversal stops as soon as the
//! income is exhausted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::BracketApportioner;
//! use tax_core::TaxTable;
//!
//! let table = TaxTable::standard();
//! let apportionment = BracketApportioner::new(&table).apportion(dec!(3300000));
//!
//! assert_eq!(apportionment.breakdown.len(), 3);
//! assert_eq!(apportionment.total_tax, dec!(383999.82));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{BracketAllocation, TaxTable};

/// Per-bracket allocations and their summed tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apportionment {
    pub breakdown: Vec<BracketAllocation>,
    pub total_tax: Decimal,
}

impl Apportionment {
    /// Sum of `amount_taxed` over the breakdown.
    pub fn amount_taxed(&self) -> Decimal {
        self.breakdown.iter().map(|a| a.amount_taxed).sum()
    }
}

#[derive(Debug, Clone)]
pub struct BracketApportioner<'a> {
    table: &'a TaxTable,
}

impl<'a> BracketApportioner<'a> {
    pub fn new(table: &'a TaxTable) -> Self {
        Self { table }
    }

    pub fn apportion(
        &self,
        taxable_income: Decimal,
    ) -> Apportionment {
        let mut remaining = taxable_income;
        let mut result = Apportionment::default();

        for bracket in self.table {
            if remaining <= Decimal::ZERO {
                break;
            }

            let amount_in_bracket = match bracket.capacity() {
                Some(capacity) => remaining.min(capacity),
                None => remaining,
            };

            if amount_in_bracket > Decimal::ZERO {
                let tax_for_bracket = amount_in_bracket * bracket.tax_rate;
                trace!(
                    bracket = %bracket.label,
                    amount = %amount_in_bracket,
                    tax = %tax_for_bracket,
                    "allocated income to bracket"
                );

                result.breakdown.push(BracketAllocation {
                    bracket: bracket.label.clone(),
                    rate: bracket.tax_rate,
                    amount_taxed: amount_in_bracket,
                    tax_owed: tax_for_bracket,
                });
                result.total_tax += tax_for_bracket;
                remaining -= amount_in_bracket;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxBracket;

    fn apportion(taxable: Decimal) -> Apportionment {
        let table = TaxTable::standard();
        BracketApportioner::new(&table).apportion(taxable)
    }

    #[test]
    fn zero_taxable_income_has_empty_breakdown() {
        let result = apportion(Decimal::ZERO);

        assert!(result.breakdown.is_empty());
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn income_inside_zero_rate_bracket_is_listed_tax_free() {
        let result = apportion(dec!(500000));

        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].bracket, "First ₦800,000");
        assert_eq!(result.breakdown[0].amount_taxed, dec!(500000));
        assert_eq!(result.breakdown[0].tax_owed, Decimal::ZERO);
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn upper_bound_of_first_bracket_is_untaxed() {
        assert_eq!(apportion(dec!(800000)).total_tax, Decimal::ZERO);
    }

    #[test]
    fn first_bracket_absorbs_one_unit_past_its_upper_bound() {
        // capacity = 800,000 - 0 + 1
        let result = apportion(dec!(800001));

        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn first_taxed_unit_is_taxed_at_fifteen_percent() {
        let result = apportion(dec!(800002));

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[1].amount_taxed, dec!(1));
        assert_eq!(result.total_tax, dec!(0.15));
    }

    #[test]
    fn reference_taxable_income_spans_three_brackets() {
        let result = apportion(dec!(3300000));

        assert_eq!(
            result.breakdown,
            vec![
                BracketAllocation {
                    bracket: "First ₦800,000".to_string(),
                    rate: dec!(0),
                    amount_taxed: dec!(800001),
                    tax_owed: dec!(0),
                },
                BracketAllocation {
                    bracket: "₦800,001 - ₦3,000,000".to_string(),
                    rate: dec!(0.15),
                    amount_taxed: dec!(2200000),
                    tax_owed: dec!(330000),
                },
                BracketAllocation {
                    bracket: "₦3,000,001 - ₦12,000,000".to_string(),
                    rate: dec!(0.18),
                    amount_taxed: dec!(299999),
                    tax_owed: dec!(53999.82),
                },
            ]
        );
        assert_eq!(result.total_tax, dec!(383999.82));
        assert_eq!(result.amount_taxed(), dec!(3300000));
    }

    #[test]
    fn very_large_income_reaches_unbounded_bracket() {
        let result = apportion(dec!(100000000));

        assert_eq!(result.breakdown.len(), 6);
        let top = result.breakdown.last().unwrap();
        assert_eq!(top.bracket, "Above ₦50,000,000");
        assert_eq!(result.amount_taxed(), dec!(100000000));
    }

    #[test]
    fn total_tax_matches_breakdown_sum() {
        let result = apportion(dec!(27654321.5));

        let sum: Decimal = result.breakdown.iter().map(|a| a.tax_owed).sum();
        assert_eq!(sum, result.total_tax);
    }

    #[test]
    fn injected_table_is_used_instead_of_standard() {
        let table = TaxTable::new(vec![
            TaxBracket::new(dec!(0), Some(dec!(99)), dec!(0.10), "low"),
            TaxBracket::new(dec!(100), None, dec!(0.50), "high"),
        ])
        .unwrap();

        let result = BracketApportioner::new(&table).apportion(dec!(150));

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].amount_taxed, dec!(100));
        assert_eq!(result.breakdown[1].amount_taxed, dec!(50));
        assert_eq!(result.total_tax, dec!(35));
    }
}
