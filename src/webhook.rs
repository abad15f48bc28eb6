//! Decoding of out-of-band webhook notifications.
//!
//! Payloads arrive from the caller's HTTP stack as raw text. The decoder
//! shape-checks first (parse as a generic JSON object, require `id` and a
//! non-empty string `name`), and only then decodes into
//! [`crate::entities::Event`]. Malformed input at either stage is a typed
//! [`Error::InvalidArgument`] wrapping the parse error, never a panic.

use serde_json::Value;

use crate::entities::Event;
use crate::error::{Error, Result};

/// Validate and decode a webhook payload into an [`Event`].
pub fn decode_event(payload: &str) -> Result<Event> {
    let value: Value = serde_json::from_str(payload).map_err(|err| {
        Error::invalid_argument("payload", format!("not a valid event: {err}"))
    })?;

    let object = value.as_object().ok_or_else(|| {
        Error::invalid_argument("payload", "not a valid event: expected a JSON object")
    })?;
    if !object.contains_key("id") && !object.contains_key("Id") {
        return Err(Error::invalid_argument(
            "payload",
            "not a valid event: missing `id`",
        ));
    }
    let name = object.get("name").or_else(|| object.get("Name"));
    match name {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        _ => {
            return Err(Error::invalid_argument(
                "payload",
                "not a valid event: `name` must be a non-empty string",
            ));
        }
    }

    serde_json::from_value(value).map_err(|err| {
        Error::invalid_argument("payload", format!("not a valid event: {err}"))
    })
}
