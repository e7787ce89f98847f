use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Remove thousands separators (`1,23,456.78` -> `123456.78`).
pub fn strip_thousands(s: &str) -> String {
    s.replace(',', "")
}

/// Parse a plain numeric token. Grouped tokens such as `1,234` do not parse.
pub fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok()
}

/// Parse a numeric token after stripping thousands separators.
pub fn parse_grouped(s: &str) -> Option<Decimal> {
    parse_number(&strip_thousands(s))
}

/// Round to two decimal places, the precision statements report amounts in.
/// Midpoints round away from zero (`0.125` -> `0.13`).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `values`, rounded to two decimal places.
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum_money<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    round_money(
        values
            .into_iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn strip_indian_grouping() {
        assert_eq!(strip_thousands("1,23,456.78"), "123456.78");
    }

    #[test]
    fn parse_number_plain() {
        assert_eq!(parse_number("10.50"), Some(dec("10.50")));
        assert_eq!(parse_number(" 100 "), Some(dec("100")));
        assert_eq!(parse_number("-3.2"), Some(dec("-3.2")));
    }

    #[test]
    fn parse_number_rejects_grouped_and_garbage() {
        assert_eq!(parse_number("1,234"), None);
        assert_eq!(parse_number("INE002A01018"), None);
        assert_eq!(parse_number("31-03-2024"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn parse_grouped_strips_commas() {
        assert_eq!(parse_grouped("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_grouped("abc"), None);
    }

    #[test]
    fn sum_money_rounds() {
        assert_eq!(sum_money([dec("0.104"), dec("0.2")]), dec("0.30"));
        assert_eq!(sum_money(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec("10000.125")), dec("10000.13"));
        assert_eq!(round_money(dec("0.305")), dec("0.31"));
        assert_eq!(round_money(dec("-0.125")), dec("-0.13"));
        assert_eq!(round_money(dec("0.124")), dec("0.12"));
    }

    #[test]
    fn sum_money_saturates() {
        assert_eq!(sum_money([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(sum_money([Decimal::MIN, Decimal::MIN]), Decimal::MIN);
    }
}
