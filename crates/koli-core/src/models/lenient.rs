//! Tolerant deserializers for the back-office JSON.
//!
//! The remote system is inconsistent about types: ids arrive as numbers or
//! numeric strings, optional text arrives as `null`, and flags are strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text field: strings verbatim, numbers/bools as their text, null/missing as "".
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Optional text field: null/missing/empty string become `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = string(deserializer)?;
    Ok((!s.is_empty()).then_some(s))
}

/// The `success` flag. Only JSON strings are kept; a boolean `true` is NOT
/// the contract's `"true"` and reads as "".
pub fn flag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// Integer from a number or numeric string; anything else is `None`.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64))
}

/// Integer defaulting to 0.
pub fn i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    opt_i64(deserializer).map(|v| v.unwrap_or(0))
}

/// Float from a number or numeric string, defaulting to 0.
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Boolean from a bool, `"true"`/`"false"`, or 0/1.
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s == "1",
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    })
}

/// Integer view of a JSON value: integral numbers and numeric strings.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string")]
        text: String,
        #[serde(default, deserialize_with = "flag")]
        success: String,
        #[serde(default, deserialize_with = "opt_i64")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "bool_or_false")]
        admin: bool,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let p = probe(r#"{"text": null}"#);
        assert_eq!(p.text, "");
        assert_eq!(p.success, "");
        assert_eq!(p.id, None);
        assert!(!p.admin);
    }

    #[test]
    fn test_boolean_success_is_not_the_string_contract() {
        assert_eq!(probe(r#"{"success": true}"#).success, "");
        assert_eq!(probe(r#"{"success": "true"}"#).success, "true");
    }

    #[test]
    fn test_numeric_string_ids() {
        assert_eq!(probe(r#"{"id": "42"}"#).id, Some(42));
        assert_eq!(probe(r#"{"id": 42}"#).id, Some(42));
        assert_eq!(probe(r#"{"id": 42.0}"#).id, Some(42));
        assert_eq!(probe(r#"{"id": "abc"}"#).id, None);
    }

    #[test]
    fn test_number_text_and_admin_flags() {
        assert_eq!(probe(r#"{"text": 7}"#).text, "7");
        assert!(probe(r#"{"admin": "true"}"#).admin);
        assert!(probe(r#"{"admin": 1}"#).admin);
    }
}
