//! Defaulting accessors over loosely-typed JSON payloads.
//!
//! Flight, quote and pax-detail payloads arrive as untyped JSON with many
//! optional and aliased keys. Nothing here fails: a missing, null, empty or
//! wrongly-typed field reads as `None`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{from_epoch, minutes_from_number, parse_minutes, parse_utc};

/// Trimmed string form of a scalar. Numbers are rendered, other types ignored.
pub fn scalar_str(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// First non-empty scalar among `keys`.
pub fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(scalar_str)
}

/// Follow a path of object keys.
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// Numeric reading of a scalar (numbers or numeric strings).
pub fn scalar_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// First non-negative integer among `keys`, rounding fractional values.
pub fn first_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(scalar_f64)
        .find_map(minutes_from_number)
}

/// First duration among `keys`, accepting numbers or `H:MM` strings.
pub fn first_minutes(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::Number(n) => n.as_f64().and_then(minutes_from_number),
            Value::String(s) => parse_minutes(s),
            _ => None,
        })
}

/// Parse a timestamp scalar: strings via [`parse_utc`], numbers as epoch.
pub fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_utc(s),
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        _ => None,
    }
}

/// First parseable timestamp among `keys`.
pub fn first_timestamp(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(timestamp)
}

/// Uppercased list from an array of strings or a comma-separated string.
pub fn upper_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .map(|item| item.trim().to_uppercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Object entries of an array field, skipping non-objects.
pub fn objects<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Value> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_str_skips_empty_and_null() {
        let v = json!({"a": null, "b": "  ", "c": " CYYC ", "d": "CYEG"});
        assert_eq!(first_str(&v, &["a", "b", "c", "d"]), Some("CYYC".into()));
        assert_eq!(first_str(&v, &["missing"]), None);
    }

    #[test]
    fn first_str_renders_numbers() {
        let v = json!({"id": 987});
        assert_eq!(first_str(&v, &["id"]), Some("987".into()));
    }

    #[test]
    fn first_u32_accepts_numeric_strings() {
        let v = json!({"pax": "4", "bad": "four", "neg": -2});
        assert_eq!(first_u32(&v, &["pax"]), Some(4));
        assert_eq!(first_u32(&v, &["bad", "neg", "pax"]), Some(4));
        assert_eq!(first_u32(&v, &["bad"]), None);
    }

    #[test]
    fn minutes_from_either_shape() {
        let v = json!({"blockTime": 75, "plannedBlockTime": "6:40"});
        assert_eq!(first_minutes(&v, &["blockTime"]), Some(75));
        assert_eq!(first_minutes(&v, &["plannedBlockTime"]), Some(400));
        assert_eq!(first_minutes(&v, &["nope", "plannedBlockTime"]), Some(400));
    }

    #[test]
    fn timestamps_from_strings_and_epochs() {
        let v = json!({"s": "2025-11-19T15:00:00Z", "ms": 1_763_564_400_000_i64, "bad": "x"});
        let a = first_timestamp(&v, &["bad", "s"]).unwrap();
        let b = first_timestamp(&v, &["ms"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn upper_list_shapes() {
        assert_eq!(
            upper_list(Some(&json!(["cuba", " mexico ", 3]))),
            vec!["CUBA", "MEXICO"]
        );
        assert_eq!(upper_list(Some(&json!("cuba, ,russia"))), vec!["CUBA", "RUSSIA"]);
        assert!(upper_list(Some(&json!(42))).is_empty());
        assert!(upper_list(None).is_empty());
    }

    #[test]
    fn path_walks_objects() {
        let v = json!({"flightInfo": {"flightId": "F-1"}});
        assert_eq!(path(&v, &["flightInfo", "flightId"]), Some(&json!("F-1")));
        assert_eq!(path(&v, &["flightInfo", "nope"]), None);
    }

    #[test]
    fn objects_filters_non_objects() {
        let v = json!({"tickets": [{"a": 1}, 2, "x", {"b": 2}]});
        assert_eq!(objects(v.get("tickets")).count(), 2);
        assert_eq!(objects(v.get("missing")).count(), 0);
    }
}
