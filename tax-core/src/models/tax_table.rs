use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::TaxBracket;

/// Reasons a bracket sequence cannot be used as a tax table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("no tax brackets provided")]
    Empty,

    #[error("first bracket must start at 0, found {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("bracket {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} upper bound {max} is below its lower bound {min}")]
    InvertedBounds {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    #[error("last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("bracket {index} upper bound {max} leaves no room for the next bracket")]
    BoundOverflow { index: usize, max: Decimal },

    #[error("bracket {index} rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// An ordered, validated set of brackets covering `[0, +inf)`.
///
/// The brackets are contiguous (`next.min_income == prev.max_income + 1`),
/// ascending, and exactly the last one is unbounded. Once built a table is
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTable {
    brackets: Vec<TaxBracket>,
}

impl TaxTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxTableError> {
        let first = brackets.first().ok_or(TaxTableError::Empty)?;
        if !first.min_income.is_zero() {
            return Err(TaxTableError::DoesNotStartAtZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(TaxTableError::RateOutOfRange {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            match bracket.max_income {
                Some(max) if max < bracket.min_income => {
                    return Err(TaxTableError::InvertedBounds {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                Some(max) => {
                    if index == last_index {
                        return Err(TaxTableError::MissingUnboundedBracket);
                    }
                    let expected = max
                        .checked_add(Decimal::ONE)
                        .ok_or(TaxTableError::BoundOverflow { index, max })?;
                    let found = brackets[index + 1].min_income;
                    if found != expected {
                        return Err(TaxTableError::NotContiguous {
                            index: index + 1,
                            expected,
                            found,
                        });
                    }
                }
                None if index != last_index => {
                    return Err(TaxTableError::UnboundedNotLast(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// The reference schedule: 0% up to 800,000 then 15/18/21/23/25%.
    pub fn standard() -> Self {
        let brackets = vec![
            TaxBracket::new(
                Decimal::ZERO,
                Some(Decimal::from(800_000)),
                Decimal::ZERO,
                "First ₦800,000",
            ),
            TaxBracket::new(
                Decimal::from(800_001),
                Some(Decimal::from(3_000_000)),
                Decimal::new(15, 2),
                "₦800,001 - ₦3,000,000",
            ),
            TaxBracket::new(
                Decimal::from(3_000_001),
                Some(Decimal::from(12_000_000)),
                Decimal::new(18, 2),
                "₦3,000,001 - ₦12,000,000",
            ),
            TaxBracket::new(
                Decimal::from(12_000_001),
                Some(Decimal::from(25_000_000)),
                Decimal::new(21, 2),
                "₦12,000,001 - ₦25,000,000",
            ),
            TaxBracket::new(
                Decimal::from(25_000_001),
                Some(Decimal::from(50_000_000)),
                Decimal::new(23, 2),
                "₦25,000,001 - ₦50,000,000",
            ),
            TaxBracket::new(
                Decimal::from(50_000_001),
                None,
                Decimal::new(25, 2),
                "Above ₦50,000,000",
            ),
        ];

        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Highest marginal rate in the table.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.tax_rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a TaxTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket::new(min, max, rate, "test")
    }

    #[test]
    fn standard_table_passes_validation() {
        let standard = TaxTable::standard();

        let rebuilt = TaxTable::new(standard.brackets().to_vec());

        assert_eq!(rebuilt, Ok(standard));
    }

    #[test]
    fn standard_table_has_six_brackets_ending_unbounded() {
        let table = TaxTable::standard();

        assert_eq!(table.len(), 6);
        assert!(table.brackets()[5].is_unbounded());
        assert_eq!(table.top_rate(), dec!(0.25));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(TaxTable::new(vec![]), Err(TaxTableError::Empty));
    }

    #[test]
    fn table_must_start_at_zero() {
        let result = TaxTable::new(vec![bracket(dec!(1), None, dec!(0.1))]);

        assert_eq!(result, Err(TaxTableError::DoesNotStartAtZero(dec!(1))));
    }

    #[test]
    fn gap_between_brackets_is_rejected() {
        let result = TaxTable::new(vec![
            bracket(dec!(0), Some(dec!(100)), dec!(0)),
            bracket(dec!(102), None, dec!(0.1)),
        ]);

        assert_eq!(
            result,
            Err(TaxTableError::NotContiguous {
                index: 1,
                expected: dec!(101),
                found: dec!(102),
            })
        );
    }

    #[test]
    fn overlapping_brackets_are_rejected() {
        let result = TaxTable::new(vec![
            bracket(dec!(0), Some(dec!(100)), dec!(0)),
            bracket(dec!(100), None, dec!(0.1)),
        ]);

        assert!(matches!(result, Err(TaxTableError::NotContiguous { .. })));
    }

    #[test]
    fn unbounded_bracket_must_be_last() {
        let result = TaxTable::new(vec![
            bracket(dec!(0), None, dec!(0)),
            bracket(dec!(101), None, dec!(0.1)),
        ]);

        assert_eq!(result, Err(TaxTableError::UnboundedNotLast(0)));
    }

    #[test]
    fn bounded_last_bracket_is_rejected() {
        let result = TaxTable::new(vec![bracket(dec!(0), Some(dec!(100)), dec!(0))]);

        assert_eq!(result, Err(TaxTableError::MissingUnboundedBracket));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = TaxTable::new(vec![
            bracket(dec!(0), Some(dec!(-5)), dec!(0)),
            bracket(dec!(-4), None, dec!(0.1)),
        ]);

        assert!(matches!(
            result,
            Err(TaxTableError::InvertedBounds { index: 0, .. })
        ));
    }

    #[test]
    fn bounded_bracket_at_decimal_max_is_rejected() {
        let result = TaxTable::new(vec![
            bracket(dec!(0), Some(Decimal::MAX), dec!(0)),
            bracket(dec!(1), None, dec!(0.1)),
        ]);

        assert_eq!(
            result,
            Err(TaxTableError::BoundOverflow {
                index: 0,
                max: Decimal::MAX,
            })
        );
    }

    #[test]
    fn rate_above_one_is_rejected() {
        let result = TaxTable::new(vec![bracket(dec!(0), None, dec!(1.5))]);

        assert_eq!(
            result,
            Err(TaxTableError::RateOutOfRange {
                index: 0,
                rate: dec!(1.5),
            })
        );
    }
}
