//! Natural-key to id resolution
//!
//! NetBox mutations take the numeric id, while callers work with addresses,
//! prefixes, names and VLAN ids. Resolution is a linear scan over the
//! collection as returned by the server.

use serde_json::Value;

/// Id of the first record whose `field` equals `key`
///
/// Matching is exact JSON equality, so a VLAN `vid` of `100` matches the
/// number `100` but not the string `"100"`. When several records share the
/// key, the first one in server order wins.
pub fn find_id(results: &[Value], field: &str, key: &Value) -> Option<u64> {
    results
        .iter()
        .find(|item| item.get(field) == Some(key))
        .and_then(|item| item.get("id"))
        .and_then(Value::as_u64)
}

/// Render a key for error messages and logs
pub fn key_display(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
