//! Record helpers shared by accessors, the cache, and the typed client.
//!
//! A record is a JSON object carrying an integer `id` field. Real ids are
//! positive integers assigned by the store; temporary ids handed out by the
//! optimistic cache are negative.

use serde_json::Value;

/// Extract the integer `id` field from a record. Returns `None` if the
/// record is not an object or carries no integer id.
pub fn id_of(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// Merge `fields` into `record`, replacing existing values key by key.
///
/// Both sides must be JSON objects; anything else is left untouched.
pub fn merge_fields(record: &mut Value, fields: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (record, fields) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}
