use crate::error::NormalizerError;
use core_types::{is_not_modeled, RawValue};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// A shared `null` for lookups that found nothing.
pub static NULL: Value = Value::Null;

/// Characters stripped from numeric strings before parsing.
const STRIPPED_CHARS: &[char] = &['$', '\u{20ac}', '\u{a3}', '\u{a5}', '%', ','];

/// Parses a display-style numeric string such as `"$4,500,000"`, `"8.5%"` or `"(1,200)"`.
pub fn parse_decimal(raw: &str) -> Result<Decimal, NormalizerError> {
    let mut text = raw.trim();
    let negative = text.starts_with('(') && text.ends_with(')') && text.len() > 2;
    if negative {
        text = &text[1..text.len() - 1];
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c) && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(NormalizerError::UnparsableNumber(raw.to_string()));
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| NormalizerError::UnparsableNumber(raw.to_string()))?;

    Ok(if negative { -value } else { value })
}

/// Coerces any JSON value into a `Decimal`; anything that is not a finite number becomes `None`.
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number_to_decimal(number),
        Value::String(text) => {
            if text.trim().is_empty() {
                return None;
            }
            match parse_decimal(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "Numeric coercion failed; treating as missing.");
                    None
                }
            }
        }
        _ => None,
    }
}

fn number_to_decimal(number: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }
    // `Number`'s Display is the shortest round-trip form, which keeps 0.08 exact.
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Coerces a cell or summary value, keeping the not-modeled marker and unparsable text apart.
pub fn coerce_raw(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Missing,
        Value::String(text) if text.trim().is_empty() => RawValue::Missing,
        Value::String(text) if is_not_modeled(text) => RawValue::NotModeled,
        Value::String(text) => match parse_decimal(text) {
            Ok(number) => RawValue::Number(number),
            Err(_) => RawValue::Text(text.trim().to_string()),
        },
        Value::Number(number) => number_to_decimal(number)
            .map(RawValue::Number)
            .unwrap_or(RawValue::Missing),
        _ => RawValue::Missing,
    }
}

/// A trimmed, non-empty string. Numbers are stringified; everything else is `None`.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// The value as an array, or an empty slice.
pub fn as_array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    match value {
        Value::Array(items) => items,
        Value::Null => &[],
        _ => {
            log_malformed(path, "an array");
            &[]
        }
    }
}

/// The value as an object, or the shared empty object.
pub fn as_object<'a>(value: &'a Value, path: &str) -> &'a Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => empty_object(),
        _ => {
            log_malformed(path, "an object");
            empty_object()
        }
    }
}

fn empty_object() -> &'static Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

fn log_malformed(path: &str, expected: &'static str) {
    let error = NormalizerError::MalformedInput {
        path: path.to_string(),
        expected,
    };
    tracing::debug!(error = %error, "Substituting an empty default.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn strips_currency_percent_and_grouping() {
        assert_eq!(parse_decimal(" $4,500,000 "), Ok(dec!(4500000)));
        assert_eq!(parse_decimal("8.25%"), Ok(dec!(8.25)));
        assert_eq!(parse_decimal("\u{20ac}1 250.5"), Ok(dec!(1250.5)));
        assert_eq!(parse_decimal("(1,200)"), Ok(dec!(-1200)));
    }

    #[test]
    fn empty_and_garbage_become_none() {
        assert_eq!(coerce_decimal(&json!("")), None);
        assert_eq!(coerce_decimal(&json!("   ")), None);
        assert_eq!(coerce_decimal(&json!("NaN")), None);
        assert_eq!(coerce_decimal(&json!("Infinity")), None);
        assert_eq!(coerce_decimal(&json!(true)), None);
        assert_eq!(coerce_decimal(&json!({"value": 1})), None);
        assert_eq!(coerce_decimal(&Value::Null), None);
    }

    #[test]
    fn json_floats_stay_exact() {
        assert_eq!(coerce_decimal(&json!(0.08)), Some(dec!(0.08)));
        assert_eq!(coerce_decimal(&json!(4750000)), Some(dec!(4750000)));
        assert_eq!(coerce_decimal(&json!(1.418)), Some(dec!(1.418)));
    }

    #[test]
    fn raw_values_keep_not_modeled_distinct_from_missing() {
        assert_eq!(coerce_raw(&json!("Not Modeled")), RawValue::NotModeled);
        assert_eq!(coerce_raw(&json!("not_modeled")), RawValue::NotModeled);
        assert_eq!(coerce_raw(&json!("")), RawValue::Missing);
        assert_eq!(coerce_raw(&Value::Null), RawValue::Missing);
        assert_eq!(coerce_raw(&json!("950,000")), RawValue::Number(dec!(950000)));
        assert_eq!(coerce_raw(&json!("TBD")), RawValue::Text("TBD".to_string()));
    }

    #[test]
    fn shape_guards_default_instead_of_failing() {
        assert!(as_array(&json!({"a": 1}), "rows").is_empty());
        assert!(as_object(&json!([1, 2]), "content").is_empty());
        assert_eq!(as_array(&json!([1, 2]), "rows").len(), 2);
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(coerce_bool(&json!("yes")), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!("maybe")), None);
    }
}
