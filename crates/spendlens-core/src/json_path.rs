//! Optional extraction from nested JSON documents
//!
//! Spend log payloads are semi-structured: any path segment may be missing,
//! and a missing segment means "no match", never an error. Keeping this as a
//! plain capability over `serde_json::Value` lets fixtures and tests walk
//! the same paths the SQL operators do.

use serde_json::Value;

/// Path to the agent metadata object inside `proxy_server_request`.
pub const REQUESTER_METADATA: [&str; 2] = ["metadata", "requester_metadata"];

/// Value at `path`, walking objects by key and arrays by numeric segment.
pub fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// String at `path`, or `None` when any segment is missing or the leaf is
/// not a string.
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(value, path).and_then(Value::as_str)
}

/// True when `value` is null or an empty object, the two "no payload"
/// states a spend log column can carry.
pub fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects_and_arrays() {
        let doc = json!({
            "choices": [{"message": {"content": "hello"}}],
            "model": "gpt-4o",
        });

        assert_eq!(
            str_at(&doc, &["choices", "0", "message", "content"]),
            Some("hello")
        );
        assert_eq!(str_at(&doc, &["model"]), Some("gpt-4o"));
    }

    #[test]
    fn missing_segments_are_none_not_errors() {
        let doc = json!({"metadata": {}});

        assert_eq!(str_at(&doc, &["metadata", "requester_metadata", "agent_name"]), None);
        assert_eq!(str_at(&doc, &["choices", "0", "message", "content"]), None);
        assert_eq!(str_at(&Value::Null, &["anything"]), None);
    }

    #[test]
    fn non_string_leaves_are_none() {
        let doc = json!({"count": 3});
        assert_eq!(str_at(&doc, &["count"]), None);
    }

    #[test]
    fn empty_document_detection() {
        assert!(is_empty_document(&Value::Null));
        assert!(is_empty_document(&json!({})));
        assert!(!is_empty_document(&json!({"model": "gpt-4o"})));
        assert!(!is_empty_document(&json!([])));
    }
}
