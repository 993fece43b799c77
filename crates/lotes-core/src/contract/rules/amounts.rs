//! Brazilian-formatted amounts ("1.234,56").

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a Brazilian-formatted amount.
///
/// `.` is the thousands separator and `,` the decimal point. Returns `None`
/// for anything that does not parse after normalization.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// [`parse_brl_amount`] over an optional token.
pub fn parse_brl_amount_opt(s: Option<&str>) -> Option<Decimal> {
    s.and_then(parse_brl_amount)
}

/// Format an amount in Brazilian style with two decimals (1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", rounded.abs());

    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => (s.as_str(), "00"),
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

/// Format an optional amount, rendering absence as an empty string.
pub fn format_brl_amount_opt(amount: Option<Decimal>) -> String {
    amount.map(format_brl_amount).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brl_amount() {
        assert_eq!(
            parse_brl_amount("1.234,56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(
            parse_brl_amount("100,00"),
            Some(Decimal::from_str("100").unwrap())
        );
        assert_eq!(
            parse_brl_amount("12.345.678,90"),
            Some(Decimal::from_str("12345678.90").unwrap())
        );
        assert_eq!(parse_brl_amount(" 1500 "), Some(Decimal::from(1500)));
    }

    #[test]
    fn test_parse_malformed_is_absent() {
        assert_eq!(parse_brl_amount(""), None);
        assert_eq!(parse_brl_amount("."), None);
        assert_eq!(parse_brl_amount("1,2,3"), None);
        assert_eq!(parse_brl_amount("abc"), None);
        assert_eq!(parse_brl_amount_opt(None), None);
    }

    #[test]
    fn test_format_brl_amount() {
        let amount = Decimal::from_str("1234.56").unwrap();
        assert_eq!(format_brl_amount(amount), "1.234,56");

        let amount = Decimal::from_str("12345678.9").unwrap();
        assert_eq!(format_brl_amount(amount), "12.345.678,90");

        let amount = Decimal::from_str("-1234.5").unwrap();
        assert_eq!(format_brl_amount(amount), "-1.234,50");

        let amount = Decimal::from_str("0.125").unwrap();
        assert_eq!(format_brl_amount(amount), "0,13");

        assert_eq!(format_brl_amount_opt(None), "");
    }

    #[test]
    fn test_format_then_parse_keeps_value() {
        for s in ["1.234,56", "0,01", "999,999", "1.000.000", "42", "-7.500,25"] {
            let value = parse_brl_amount(s).unwrap();
            let formatted = format_brl_amount(value);
            assert_eq!(
                parse_brl_amount(&formatted),
                Some(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)),
                "round trip of {s}"
            );
        }
    }
}
