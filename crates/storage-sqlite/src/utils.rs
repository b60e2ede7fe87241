//! Helpers for the TEXT columns that hold decimals and enums.
//!
//! Money and prices are stored as canonical decimal strings so no value
//! ever passes through a float.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parses a decimal column. A malformed value is reported, not zeroed.
pub fn parse_decimal(value: &str, column: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value.trim())
        .or_else(|_| Decimal::from_scientific(value.trim()))
        .map_err(|e| {
            log::error!("Invalid decimal in column {}: '{}' ({})", column, value, e);
            StorageError::CorruptValue(format!("{}: '{}'", column, value))
        })
}

pub fn parse_optional_decimal(
    value: Option<&str>,
    column: &str,
) -> Result<Option<Decimal>, StorageError> {
    value.map(|v| parse_decimal(v, column)).transpose()
}

/// Parses an enum column through its `FromStr` implementation.
pub fn parse_enum<T>(value: &str, column: &str) -> Result<T, StorageError>
where
    T: FromStr,
{
    value.parse::<T>().map_err(|_| {
        log::error!("Invalid value in column {}: '{}'", column, value);
        StorageError::CorruptValue(format!("{}: '{}'", column, value))
    })
}

/// `LIKE` pattern matching `term` anywhere, with a backslash as the escape
/// character for literal `%` and `_`.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::orders::SettlementStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_text_keeps_precision() {
        assert_eq!(decimal_to_text(dec!(3997.90)), "3997.9");
        assert_eq!(parse_decimal("3997.9", "balance").unwrap(), dec!(3997.90));
        assert_eq!(parse_decimal("1e2", "balance").unwrap(), dec!(100));
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(parse_decimal("abc", "balance").is_err());
        assert!(parse_enum::<SettlementStatus>("T3", "settlement_status").is_err());
        assert_eq!(
            parse_enum::<SettlementStatus>("T1", "settlement_status").unwrap(),
            SettlementStatus::T1
        );
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("kaya"), "%kaya%");
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
