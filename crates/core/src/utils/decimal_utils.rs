//! Exact decimal helpers.
//!
//! Every quantity, price and amount in the ledger is a [`Decimal`]. Conversion to
//! `f64` happens only in [`to_display_f64`], at the presentation boundary.

use std::str::FromStr;

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, PERCENTAGE_PRECISION};

/// Rounds half away from zero (`0.125 -> 0.13`, `-0.125 -> -0.13`).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides, returning zero instead of failing when the denominator is zero.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, rounded to [`PERCENTAGE_PRECISION`]. Zero when `whole` is zero.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    round_half_up(
        safe_divide(part, whole).saturating_mul(Decimal::ONE_HUNDRED),
        PERCENTAGE_PRECISION,
    )
}

/// Parses a decimal from its stored text form, accepting scientific notation.
/// Falls back to zero (and logs) when the text is not a number at all.
pub fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}

/// Converts to `f64` for display, rounded to [`DISPLAY_DECIMAL_PRECISION`].
pub fn to_display_f64(value: Decimal) -> f64 {
    round_half_up(value, DISPLAY_DECIMAL_PRECISION)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up_midpoints() {
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
        assert_eq!(round_half_up(dec!(-0.125), 2), dec!(-0.13));
        assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
    }

    #[test]
    fn test_safe_divide_zero_denominator() {
        assert_eq!(safe_divide(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_divide(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(dec!(10000), dec!(50000)), dec!(20));
        assert_eq!(percentage_of(dec!(1), dec!(3)), dec!(33.3333));
        assert_eq!(percentage_of(dec!(5), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_sums_have_no_float_residue() {
        let total = dec!(0.1) + dec!(0.2);
        assert_eq!(total, dec!(0.3));
        assert_eq!(dec!(0.3) - total, Decimal::ZERO);
    }

    #[test]
    fn test_parse_decimal_string_tolerant() {
        assert_eq!(parse_decimal_string_tolerant("1.50", "qty"), dec!(1.50));
        assert_eq!(parse_decimal_string_tolerant("1e-3", "qty"), dec!(0.001));
        assert_eq!(parse_decimal_string_tolerant("abc", "qty"), Decimal::ZERO);
    }

    #[test]
    fn test_to_display_f64() {
        assert!((to_display_f64(dec!(12345.678)) - 12345.68).abs() < 1e-9);
        assert_eq!(to_display_f64(Decimal::ZERO), 0.0);
    }
}
