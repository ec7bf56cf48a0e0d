//! Outbound body preparation.

use serde_json::{Map, Value};

/// Parse an inbound JSON body for forwarding.
///
/// Missing, empty, unparsable or `null` bodies become `{}`. This never fails:
/// the backend is the one that rejects a toggle without the fields it needs.
pub fn json_or_empty(raw: Option<&[u8]>) -> Value {
    let Some(raw) = raw.filter(|b| !b.is_empty()) else {
        return empty_object();
    };

    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Null) => empty_object(),
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, bytes = raw.len(), "Inbound body is not JSON, forwarding {{}}");
            empty_object()
        }
    }
}

pub fn empty_object() -> Value {
    Value::Object(Map::new())
}
