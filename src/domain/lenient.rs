//! Tolerant field decoders for records fetched from the document store.
//!
//! Store documents are written by several clients and routinely carry
//! numbers encoded as strings, `null`s, or values of the wrong type. The
//! helpers here never fail on such input: anything that is not a usable
//! value decodes as "absent" and the entity accessors apply their defaults.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a raw JSON value as a finite number.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Decode a number, falling back to `0.0` for malformed input.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_amount(deserializer)?.unwrap_or(0.0))
}

/// Decode an optional number; malformed input becomes `None`.
pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Decode an optional whole number, truncating fractional parts.
pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_amount(deserializer)?.map(|value| value.trunc() as i64))
}

/// Decode a whole number, falling back to `0` for malformed input.
pub fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}

/// Decode an optional flag; anything that is not a JSON boolean is `None`.
pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => Some(flag),
        _ => None,
    })
}

/// Decode text, accepting numbers as their decimal rendering.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Decode optional text; empty strings are kept, other types become `None`
/// unless they are numbers.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Decode a list of strings, dropping entries of any other type.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a timestamp stored either as an RFC 3339 string or as a
/// `{seconds, nanoseconds}` object.
pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos).single()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "amount")]
        price: f64,
        #[serde(default, deserialize_with = "optional_count")]
        stock: Option<i64>,
        #[serde(default, deserialize_with = "optional_flag")]
        active: Option<bool>,
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "optional_timestamp")]
        created_at: Option<DateTime<Utc>>,
    }

    fn probe(value: Value) -> Probe {
        match serde_json::from_value(value) {
            Ok(probe) => probe,
            Err(err) => panic!("lenient decoding must not fail: {err}"),
        }
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let decoded = probe(json!({"price": " 12.5 ", "stock": "7"}));
        assert_eq!(decoded.price, 12.5);
        assert_eq!(decoded.stock, Some(7));
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let decoded = probe(json!({"price": "abc", "stock": {"nested": true}}));
        assert_eq!(decoded.price, 0.0);
        assert_eq!(decoded.stock, None);
    }

    #[test]
    fn missing_and_null_fields_use_defaults() {
        let decoded = probe(json!({"price": null}));
        assert_eq!(decoded.price, 0.0);
        assert_eq!(decoded.stock, None);
        assert_eq!(decoded.active, None);
        assert_eq!(decoded.name, "");
    }

    #[test]
    fn fractional_counts_are_truncated() {
        let decoded = probe(json!({"stock": 3.9}));
        assert_eq!(decoded.stock, Some(3));
    }

    #[test]
    fn non_boolean_flags_are_ignored() {
        let decoded = probe(json!({"active": "false"}));
        assert_eq!(decoded.active, None);
    }

    #[test]
    fn numeric_names_are_rendered() {
        let decoded = probe(json!({"name": 42}));
        assert_eq!(decoded.name, "42");
    }

    #[test]
    fn timestamps_accept_both_encodings() {
        let from_string = probe(json!({"created_at": "2024-03-01T10:00:00Z"}));
        let from_object = probe(json!({"created_at": {"seconds": 1709287200, "nanoseconds": 0}}));
        assert!(from_string.created_at.is_some());
        assert_eq!(from_string.created_at, from_object.created_at);

        let garbage = probe(json!({"created_at": "yesterday"}));
        assert_eq!(garbage.created_at, None);
    }
}
