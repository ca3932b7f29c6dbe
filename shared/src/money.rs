//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` (JSON numbers, UI input) but every sum and every
//! rounding step goes through `Decimal`.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// `qty * price` for one line, `None` on overflow
pub fn line_total(qty: u32, price: f64) -> Option<Decimal> {
    Decimal::from(qty).checked_mul(to_decimal(price))
}

/// Sum of `qty * price` over a sequence of lines, `None` on overflow
pub fn sum_lines<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (u32, f64)>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (qty, price)| acc.checked_add(line_total(qty, price)?))
}

/// Format an amount with exactly two fractional digits ("123.40")
pub fn format_fixed2(amount: f64) -> String {
    format!("{:.2}", round_money(to_decimal(amount)))
}

/// Whether two amounts agree within [`MONEY_TOLERANCE`]
pub fn amounts_match(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed2() {
        assert_eq!(format_fixed2(123.4), "123.40");
        assert_eq!(format_fixed2(0.0), "0.00");
        assert_eq!(format_fixed2(1099.0), "1099.00");
        assert_eq!(format_fixed2(0.125), "0.13");
        assert_eq!(format_fixed2(99.999), "100.00");
    }

    #[test]
    fn test_sum_lines() {
        let total = sum_lines([(2, 499.5), (1, 100.0)]).unwrap();
        assert_eq!(to_f64(total), 1099.0);
        assert_eq!(sum_lines(Vec::<(u32, f64)>::new()), Some(Decimal::ZERO));
    }

    #[test]
    fn test_no_float_drift() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        let total = sum_lines([(1, 0.1), (1, 0.2)]).unwrap();
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(line_total(u32::MAX, 1e20), None);
        assert_eq!(sum_lines([(1, 10.0), (u32::MAX, 1e20)]), None);
        // each line fits, the sum does not
        assert_eq!(sum_lines([(u32::MAX, 1e19), (u32::MAX, 1e19)]), None);
        assert!(line_total(9999, 1_000_000.0).is_some());
    }

    #[test]
    fn test_amounts_match() {
        assert!(amounts_match(1099.0, 1099.004));
        assert!(!amounts_match(1099.0, 1099.02));
    }
}
