//! Response normalization
//!
//! The back-office speaks several response dialects. Generic service calls
//! share an envelope (`success`/`err`/`msg`/`data.items`); task calls return
//! ad-hoc shapes that sometimes hide the result id inside a JSON-encoded
//! `data` string. Each helper here handles one of those shapes and nothing
//! else.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::lenient::as_i64;
use crate::services::transport::RawResponse;
use crate::utils::preview;

/// `err` value the barcode lookup uses for "no koli carries this barcode"
pub const ERR_NOT_FOUND: i64 = 99;

/// Keys tried, in order, when the result id is nested in `data`
const NESTED_BOX_ID_KEYS: &[&str] = &["resultBoxId", "boxId", "id", "RecId"];

const REC_ID_KEYS: &[&str] = &["recId", "RecId"];

/// Turn a raw response into JSON: non-2xx first, then body parsing
pub fn parse_body(raw: &RawResponse) -> Result<Value, ApiError> {
    if !raw.is_success() {
        return Err(ApiError::HttpStatus(raw.status));
    }

    serde_json::from_str(&raw.body).map_err(|e| {
        log::warn!(
            "[api] Response is not JSON ({}), body starts with: {}",
            e,
            preview(&raw.body, 200)
        );
        ApiError::InvalidResponse(e.to_string())
    })
}

/// `success` must be the string `"true"`; a boolean does not count
pub fn is_success(value: &Value) -> bool {
    matches!(value.get("success"), Some(Value::String(s)) if s == "true")
}

/// Server message, if a non-empty one was sent
pub fn message(value: &Value) -> Option<String> {
    match value.get("msg") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// `success` flag as sent, `""` when absent or not a string
pub fn success_flag(value: &Value) -> String {
    match value.get("success") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

pub fn err_code(value: &Value) -> Option<i64> {
    value.get("err").and_then(as_i64)
}

/// Generic-call success contract
pub fn ensure_success(value: &Value, fallback: &str) -> Result<(), ApiError> {
    if is_success(value) {
        Ok(())
    } else {
        Err(ApiError::Business(
            message(value).unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

/// `data.items`, or an empty list when either level is missing or null
pub fn extract_items<T: DeserializeOwned>(value: &Value) -> Result<Vec<T>, ApiError> {
    let items = match value.get("data").and_then(|data| data.get("items")) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(items) => items.clone(),
    };

    serde_json::from_value(items).map_err(|e| {
        log::warn!("[api] Unexpected item shape: {}", e);
        ApiError::InvalidResponse(e.to_string())
    })
}

/// Recover the box id of a task call.
///
/// Top-level `resultBoxId` wins. Otherwise `data` (a JSON string or an
/// object) is searched for the alternate keys. Zero, empty and non-numeric
/// values are skipped; an unparsable `data` string yields `None`.
pub fn extract_result_box_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.get("resultBoxId").and_then(truthy_id) {
        return Some(id);
    }

    let nested = nested_data(value)?;
    NESTED_BOX_ID_KEYS
        .iter()
        .find_map(|key| nested.get(*key).and_then(truthy_id))
}

/// Record id of a barcode lookup: top level, then `data`, then `data.items[0]`
pub fn extract_rec_id(value: &Value) -> Option<i64> {
    let find = |v: &Value| REC_ID_KEYS.iter().find_map(|key| v.get(*key).and_then(truthy_id));

    if let Some(id) = find(value) {
        return Some(id);
    }

    let data = nested_data(value)?;
    find(&data).or_else(|| {
        data.get("items")
            .and_then(|items| items.get(0))
            .and_then(|first| find(first))
    })
}

fn nested_data(value: &Value) -> Option<Value> {
    match value.get("data")? {
        Value::String(s) if !s.is_empty() => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::debug!("[api] Could not parse nested data string: {}", e);
                None
            }
        },
        obj @ Value::Object(_) => Some(obj.clone()),
        _ => None,
    }
}

fn truthy_id(value: &Value) -> Option<i64> {
    as_i64(value).filter(|id| *id != 0)
}
