//! Utility functions for koli-core

use serde_json::Value;

/// Request body fields that must never reach the log
const SECRET_FIELDS: &[&str] = &["password", "companyPassword", "token"];

/// Placeholder written over secrets in log output
pub const MASK: &str = "****";

/// Copy of a request/response body with secret fields replaced by [`MASK`].
///
/// Only top-level fields are masked; nested payloads never carry secrets.
pub fn redact(body: &Value) -> Value {
    let mut redacted = body.clone();
    if let Value::Object(map) = &mut redacted {
        for field in SECRET_FIELDS {
            if let Some(value) = map.get_mut(*field) {
                *value = Value::String(MASK.to_string());
            }
        }
    }
    redacted
}

/// First `max` characters of `text`, for logging response bodies
pub fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_masks_secrets_only() {
        let body = json!({
            "userName": "u1",
            "password": "p1",
            "companyCode": "C1",
            "companyPassword": "cp",
            "data": "{\"name\":\"accounts\"}"
        });
        let redacted = redact(&body);

        assert_eq!(redacted["userName"], "u1");
        assert_eq!(redacted["companyCode"], "C1");
        assert_eq!(redacted["password"], MASK);
        assert_eq!(redacted["companyPassword"], MASK);
        assert_eq!(redacted["data"], body["data"]);
        // Original untouched
        assert_eq!(body["password"], "p1");
    }

    #[test]
    fn test_redact_non_object_passthrough() {
        assert_eq!(redact(&json!("plain")), json!("plain"));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("<html>error</html>", 6), "<html>");
        assert_eq!(preview("şeker", 2), "şe");
        assert_eq!(preview("short", 200), "short");
    }
}
