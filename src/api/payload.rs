//! Shape checks applied to every backend payload before it reaches the store.
//!
//! Endpoints answer either with the bare resource (`[...]`, `{...}`) or with an
//! envelope `{"success": true, "<key>": <resource>}`. An envelope carrying
//! `success: false` is a rejection and its `error` text is surfaced as-is.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

const DEFAULT_REJECTION: &str = "Request rejected by server";

/// Returns the rejection message if `value` is a `success: false` envelope.
pub fn rejection(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.get("success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    let message = map
        .get("error")
        .or_else(|| map.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_REJECTION);
    Some(message.to_string())
}

/// Strips the envelope around `key`, if there is one.
pub fn unwrap_envelope(value: Value, key: &str) -> Result<Value> {
    if let Some(message) = rejection(&value) {
        return Err(Error::Rejected(message));
    }
    match value {
        Value::Object(mut map) if map.contains_key(key) => Ok(map.remove(key).unwrap_or(Value::Null)),
        other => Ok(other),
    }
}

/// Decodes a list resource. `null` is an empty list; any element that does not
/// match the schema fails the whole list.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>> {
    match unwrap_envelope(value, key)? {
        Value::Null => Ok(Vec::new()),
        list @ Value::Array(_) => Ok(serde_json::from_value(list)?),
        other => Err(Error::Payload(format!(
            "expected a list for '{}', got {}",
            key,
            kind(&other)
        ))),
    }
}

/// Decodes the list under `key` of an object that carries several slices.
/// Unlike [`decode_list`], a payload without `key` is an error.
pub fn decode_slice<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>> {
    if let Some(message) = rejection(&value) {
        return Err(Error::Rejected(message));
    }
    match value {
        Value::Object(mut map) => match map.remove(key) {
            Some(slice) => decode_list(slice, key),
            None => Err(Error::Payload(format!("missing '{}'", key))),
        },
        other => Err(Error::Payload(format!(
            "expected an object holding '{}', got {}",
            key,
            kind(&other)
        ))),
    }
}

/// Decodes a record resource; absent fields fall back to the type's defaults.
pub fn decode_record<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    match unwrap_envelope(value, key)? {
        record @ Value::Object(_) => Ok(serde_json::from_value(record)?),
        other => Err(Error::Payload(format!(
            "expected an object for '{}', got {}",
            key,
            kind(&other)
        ))),
    }
}

/// Checks the answer to a mutating call. Returns the server's `message`, if any.
pub fn expect_success(value: Value) -> Result<Option<String>> {
    if let Some(message) = rejection(&value) {
        return Err(Error::Rejected(message));
    }
    Ok(value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
