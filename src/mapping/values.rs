//! Coercion of raw cell values into the primitive types of change requests.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::{MappingError, MappingResult};
use crate::models::CellValue;

/// Cell text, trimmed. Numbers render without a trailing fraction.
pub fn text(cell: &CellValue) -> String {
    cell.to_string().trim().to_string()
}

pub fn integer(label: &str, cell: &CellValue) -> MappingResult<i64> {
    let invalid = || MappingError::invalid_value(label, "whole number", cell.to_string());
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        CellValue::Text(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>().or_else(|_| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|n| n.fract() == 0.0 && n.is_finite())
                    .map(|n| n as i64)
                    .ok_or_else(invalid)
            })
        }
        _ => Err(invalid()),
    }
}

/// Whole number that must fit an `i32`.
pub fn int32(label: &str, cell: &CellValue) -> MappingResult<i32> {
    let value = integer(label, cell)?;
    i32::try_from(value)
        .map_err(|_| MappingError::invalid_value(label, "32-bit whole number", cell.to_string()))
}

pub fn decimal(label: &str, cell: &CellValue) -> MappingResult<Decimal> {
    let invalid = || MappingError::invalid_value(label, "decimal number", cell.to_string());
    match cell {
        CellValue::Number(n) => Decimal::try_from(*n).map_err(|_| invalid()),
        CellValue::Text(raw) => Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

pub fn float(label: &str, cell: &CellValue) -> MappingResult<f64> {
    let invalid = || MappingError::invalid_value(label, "number", cell.to_string());
    match cell {
        CellValue::Number(n) if n.is_finite() => Ok(*n),
        CellValue::Text(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Accepts booleans, 0/1 and the words true/false/yes/no in any case.
pub fn boolean(label: &str, cell: &CellValue) -> MappingResult<bool> {
    let invalid = || MappingError::invalid_value(label, "yes/no value", cell.to_string());
    match cell {
        CellValue::Bool(b) => Ok(*b),
        CellValue::Number(n) if *n == 0.0 => Ok(false),
        CellValue::Number(n) if *n == 1.0 => Ok(true),
        CellValue::Text(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Parse `Label|Value;Label|Value;...` into ordered pairs.
///
/// Tokens without a `|` are dropped. A value that is not a 32-bit whole
/// number fails the row.
pub fn parse_options(label: &str, raw: &str) -> MappingResult<Vec<(String, i32)>> {
    let mut options = Vec::new();
    for token in raw.split(';') {
        let mut parts = token.split('|');
        let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let value = value
            .trim()
            .parse::<i32>()
            .map_err(|_| MappingError::invalid_value(label, "option value", value.trim()))?;
        options.push((name.trim().to_string(), value));
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CellValue::Number(42.0), 42)]
    #[case(CellValue::from(" 17 "), 17)]
    #[case(CellValue::from("100.0"), 100)]
    #[case(CellValue::from("-5"), -5)]
    fn integers_are_coerced(#[case] cell: CellValue, #[case] expected: i64) {
        assert_eq!(integer("n", &cell).unwrap(), expected);
    }

    #[rstest]
    #[case(CellValue::Number(1.5))]
    #[case(CellValue::from("ten"))]
    #[case(CellValue::Bool(true))]
    fn non_integers_are_rejected(#[case] cell: CellValue) {
        assert!(matches!(
            integer("n", &cell),
            Err(MappingError::InvalidValue { .. })
        ));
    }

    #[test]
    fn int32_rejects_overflow() {
        assert!(int32("n", &CellValue::Number(3_000_000_000.0)).is_err());
        assert_eq!(int32("n", &CellValue::Number(-7.0)).unwrap(), -7);
    }

    #[rstest]
    #[case(CellValue::Bool(true), true)]
    #[case(CellValue::Number(0.0), false)]
    #[case(CellValue::from("YES"), true)]
    #[case(CellValue::from("no"), false)]
    #[case(CellValue::from("1"), true)]
    #[case(CellValue::from("False"), false)]
    fn booleans_are_coerced(#[case] cell: CellValue, #[case] expected: bool) {
        assert_eq!(boolean("b", &cell).unwrap(), expected);
    }

    #[test]
    fn decimals_parse_text_and_numbers() {
        assert_eq!(
            decimal("d", &CellValue::from("12.345")).unwrap(),
            Decimal::new(12345, 3)
        );
        assert_eq!(decimal("d", &CellValue::Number(100.0)).unwrap(), Decimal::from(100));
        assert!(decimal("d", &CellValue::from("abc")).is_err());
    }

    #[test]
    fn malformed_option_tokens_are_skipped() {
        let options = parse_options("Options", "Red|1;Blue|2;NoPipe").unwrap();
        assert_eq!(
            options,
            vec![("Red".to_string(), 1), ("Blue".to_string(), 2)]
        );
    }

    #[test]
    fn trailing_separator_yields_no_extra_option() {
        let options = parse_options("Options", "A|10;").unwrap();
        assert_eq!(options, vec![("A".to_string(), 10)]);
    }

    #[test]
    fn non_numeric_option_value_fails() {
        assert!(matches!(
            parse_options("Options", "Red|one"),
            Err(MappingError::InvalidValue { .. })
        ));
    }
}
