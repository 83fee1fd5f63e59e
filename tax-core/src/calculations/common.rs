//! Shared numeric helpers for the tax calculations and their presentation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole currency unit, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(416666.5)), dec!(416667));
/// assert_eq!(round_whole(dec!(416666.49)), dec!(416666));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats a value with `,` between groups of three integer digits.
/// The fractional part is kept as-is.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::group_thousands;
///
/// assert_eq!(group_thousands(dec!(3000000)), "3,000,000");
/// assert_eq!(group_thousands(dec!(-1234.5)), "-1,234.5");
/// ```
pub fn group_thousands(value: Decimal) -> String {
    let text = value.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && !value.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(329999.854)), dec!(329999.85));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(27499.995)), dec!(27500.00));
    }

    #[test]
    fn round_half_up_handles_repeating_division() {
        // 31,999.985
        let monthly = dec!(383999.82) / dec!(12);

        assert_eq!(round_half_up(monthly), dec!(31999.99));
    }

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_rounds_half_up() {
        assert_eq!(round_whole(dec!(0.5)), dec!(1));
        assert_eq!(round_whole(dec!(2.5)), dec!(3));
    }

    #[test]
    fn round_whole_keeps_integers() {
        assert_eq!(round_whole(dec!(250000)), dec!(250000));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_clamps_negative_to_zero() {
        assert_eq!(max(dec!(-1400000), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // group_thousands tests
    // =========================================================================

    #[test]
    fn group_thousands_leaves_short_numbers_alone() {
        assert_eq!(group_thousands(dec!(0)), "0");
        assert_eq!(group_thousands(dec!(999)), "999");
    }

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(dec!(1000)), "1,000");
        assert_eq!(group_thousands(dec!(800001)), "800,001");
        assert_eq!(group_thousands(dec!(50000000)), "50,000,000");
    }

    #[test]
    fn group_thousands_keeps_fraction() {
        assert_eq!(group_thousands(dec!(53999.82)), "53,999.82");
    }
}
