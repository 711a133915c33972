//! Field parsing shared by request models

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INVALID_NUMBER: &str = "A valid number is required.";

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a required date parameter, recording an error when missing or malformed
pub fn required_date(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.add(field, INVALID_DATE);
            }
            parsed
        }
    }
}

/// Parse an optional date; blank strings count as absent
pub fn optional_date(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    match value {
        Some(raw) if !raw.trim().is_empty() => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.add(field, INVALID_DATE);
            }
            parsed
        }
        _ => None,
    }
}

/// Date of a JSON body; anything but a string is malformed
pub fn required_json_date(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<NaiveDate> {
    match value {
        None => required_date(errors, field, None),
        Some(Value::String(raw)) => required_date(errors, field, Some(raw)),
        Some(_) => {
            errors.add(field, INVALID_DATE);
            None
        }
    }
}

pub fn optional_json_date(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<NaiveDate> {
    match value {
        None => None,
        Some(Value::String(raw)) => optional_date(errors, field, Some(raw)),
        Some(_) => {
            errors.add(field, INVALID_DATE);
            None
        }
    }
}

/// Required, non-blank text of at most `max_len` characters
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(raw) => checked_text(errors, field, raw, max_len),
    }
}

pub fn checked_text(errors: &mut FieldErrors, field: &str, raw: &str, max_len: usize) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }
    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
        return None;
    }
    Some(value.to_string())
}

/// Accepts JSON numbers and numeric strings
pub fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Accepts JSON integers and integer strings
pub fn pk_value(value: &Value) -> Result<i32, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| format!("Invalid pk \"{}\" - object does not exist.", n)),
        Value::String(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("Invalid pk \"{}\" - object does not exist.", s)),
        Value::Bool(_) => Err("Incorrect type. Expected pk value, received bool.".to_string()),
        Value::Array(_) => Err("Incorrect type. Expected pk value, received list.".to_string()),
        Value::Object(_) => Err("Incorrect type. Expected pk value, received dict.".to_string()),
        Value::Null => Err(NOT_NULL.to_string()),
    }
}

/// Number of significant digits and decimal places of a decimal
pub fn digits(value: Decimal) -> (u32, u32) {
    let normalized = value.normalize();
    let places = normalized.scale();
    let mantissa = normalized.mantissa().unsigned_abs();
    let total = if mantissa == 0 { 1 } else { mantissa.to_string().len() as u32 };
    (total.max(places), places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_required_date() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_date(&mut errors, "start_date", Some("2025-06-01")),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(errors.is_empty());

        assert_eq!(required_date(&mut errors, "start_date", Some("06/01/2025")), None);
        assert_eq!(required_date(&mut errors, "end_date", None), None);
        assert_eq!(errors.get("start_date"), Some(&[INVALID_DATE.to_string()][..]));
        assert_eq!(errors.get("end_date"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_optional_date_blank_is_absent() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_date(&mut errors, "end_date", Some("")), None);
        assert_eq!(optional_date(&mut errors, "end_date", None), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_json_date_rejects_non_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_json_date(&mut errors, "start_date", Some(&json!("2025-06-01"))),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(errors.is_empty());

        assert_eq!(required_json_date(&mut errors, "start_date", Some(&json!(20250601))), None);
        assert_eq!(optional_json_date(&mut errors, "end_date", Some(&json!(false))), None);
        assert_eq!(optional_json_date(&mut errors, "other", None), None);
        assert_eq!(errors.get("start_date"), Some(&[INVALID_DATE.to_string()][..]));
        assert_eq!(errors.get("end_date"), Some(&[INVALID_DATE.to_string()][..]));
        assert!(!errors.contains("other"));
    }

    #[test]
    fn test_decimal_value() {
        assert_eq!(decimal_value(&json!(12.5)), Some(dec!(12.5)));
        assert_eq!(decimal_value(&json!("10.00")), Some(dec!(10.00)));
        assert_eq!(decimal_value(&json!(3)), Some(dec!(3)));
        assert_eq!(decimal_value(&json!("ten")), None);
        assert_eq!(decimal_value(&json!(true)), None);
    }

    #[test]
    fn test_pk_value() {
        assert_eq!(pk_value(&json!(4)), Ok(4));
        assert_eq!(pk_value(&json!("4")), Ok(4));
        assert!(pk_value(&json!("four")).is_err());
        assert!(pk_value(&json!(true)).unwrap_err().contains("received bool"));
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits(dec!(12345678.90)), (9, 1));
        assert_eq!(digits(dec!(0.05)), (2, 2));
        assert_eq!(digits(dec!(0)), (1, 0));
        assert_eq!(digits(dec!(100.00)), (3, 0));
        assert_eq!(digits(dec!(1.234)), (4, 3));
    }
}
