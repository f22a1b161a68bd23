//! Navigation helpers shared by the rule checkers.

use serde_json::{Map, Value};

use crate::error::RuleError;

/// JSON type name of a value, for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Entries of the top-level list `field`.
///
/// Field names are literal top-level keys, so `auth.providers` is looked up
/// as one key. An absent or `null` field has no entries to check.
pub(crate) fn list_field<'a>(
    document: &'a Value,
    field: &str,
) -> Result<Option<&'a [Value]>, RuleError> {
    let root = document.as_object().ok_or_else(|| RuleError::UnexpectedShape {
        location: "(root)".to_string(),
        expected: "object",
        found: json_kind(document),
    })?;

    match root.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(entries)) => Ok(Some(entries.as_slice())),
        Some(other) => Err(RuleError::UnexpectedShape {
            location: field.to_string(),
            expected: "array",
            found: json_kind(other),
        }),
    }
}

/// `entry` as an object, or a shape error naming its location.
pub(crate) fn entry_object<'a>(
    entry: &'a Value,
    location: &str,
) -> Result<&'a Map<String, Value>, RuleError> {
    entry.as_object().ok_or_else(|| RuleError::UnexpectedShape {
        location: location.to_string(),
        expected: "object",
        found: json_kind(entry),
    })
}

/// A field counts as present when set to anything but `null` or `""`.
pub(crate) fn is_present(object: &Map<String, Value>, field: &str) -> bool {
    match object.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_lists_have_no_entries() {
        assert!(list_field(&json!({}), "bitbucketServer").unwrap().is_none());
        assert!(list_field(&json!({"bitbucketServer": null}), "bitbucketServer")
            .unwrap()
            .is_none());
    }

    #[test]
    fn dotted_field_is_a_literal_key() {
        let doc = json!({"auth.providers": [{"type": "builtin"}]});
        assert_eq!(list_field(&doc, "auth.providers").unwrap().unwrap().len(), 1);
        let nested = json!({"auth": {"providers": []}});
        assert!(list_field(&nested, "auth.providers").unwrap().is_none());
    }

    #[test]
    fn non_array_list_is_shape_error() {
        let err = list_field(&json!({"bitbucketServer": {}}), "bitbucketServer").unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnexpectedShape { expected: "array", found: "object", .. }
        ));
    }

    #[test]
    fn non_object_root_is_shape_error() {
        let err = list_field(&json!([1, 2]), "bitbucketServer").unwrap_err();
        assert!(err.to_string().starts_with("(root): expected object"));
    }

    #[test]
    fn presence_ignores_null_and_empty_string() {
        let obj = json!({"a": "", "b": null, "c": "x", "d": false});
        let obj = obj.as_object().unwrap();
        assert!(!is_present(obj, "a"));
        assert!(!is_present(obj, "b"));
        assert!(is_present(obj, "c"));
        assert!(is_present(obj, "d"));
        assert!(!is_present(obj, "e"));
    }
}
