//! # Document Parsing
//!
//! Turns caller-supplied bytes into the immutable document tree that both
//! validation layers walk.
//!
//! JSON input is parsed leniently: `//` and `/* */` comments and trailing
//! commas are accepted, since configuration files are edited by hand. YAML
//! input is parsed with `serde_yaml` and converted to the equivalent JSON
//! value tree. Input consisting only of whitespace is an empty object.

use std::path::Path;

use serde_json::Value;

use crate::error::CoreError;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON, with comments and trailing commas permitted.
    #[default]
    Json,
    /// YAML restricted to its JSON-compatible subset.
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension: `.yaml`/`.yml` is YAML,
    /// anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Format name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Parse raw document bytes into a JSON value tree.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] for invalid UTF-8, [`CoreError::Parse`]
/// for malformed syntax, and [`CoreError::YamlConversion`] for YAML values
/// with no JSON representation.
pub fn parse_document(bytes: &[u8], format: DocumentFormat) -> Result<Value, CoreError> {
    let text = std::str::from_utf8(bytes).map_err(|source| CoreError::Encoding {
        format: format.name(),
        source,
    })?;

    if text.trim().is_empty() {
        tracing::debug!(format = format.name(), "empty document treated as {{}}");
        return Ok(Value::Object(serde_json::Map::new()));
    }

    tracing::debug!(format = format.name(), bytes = bytes.len(), "parsing document");

    match format {
        DocumentFormat::Json => {
            serde_json_lenient::from_str::<Value>(text).map_err(|e| CoreError::Parse {
                format: format.name(),
                reason: e.to_string(),
            })
        }
        DocumentFormat::Yaml => {
            let parse_error = |e: serde_yaml::Error| CoreError::Parse {
                format: format.name(),
                reason: e.to_string(),
            };
            let mut yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_error)?;
            // `<<: *anchor` keys become ordinary entries of the mapping.
            yaml.apply_merge().map_err(parse_error)?;
            yaml_to_json_value(&yaml).map_err(CoreError::YamlConversion)
        }
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped and scalar map keys are stringified. Floats that JSON
/// cannot represent (NaN, infinities) are rejected.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("site.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("site.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("site.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("site")), DocumentFormat::Json);
    }

    #[test]
    fn parses_plain_json() {
        let v = parse_document(br#"{"maxReposToSearch":123}"#, DocumentFormat::Json).unwrap();
        assert_eq!(v, json!({"maxReposToSearch": 123}));
    }

    #[test]
    fn parses_json_with_comments_and_trailing_commas() {
        let raw = br#"{
            // how many repositories to search
            "maxReposToSearch": 123,
            /* providers */
            "auth.providers": [{"type": "builtin"},],
        }"#;
        let v = parse_document(raw, DocumentFormat::Json).unwrap();
        assert_eq!(v["maxReposToSearch"], 123);
        assert_eq!(v["auth.providers"][0]["type"], "builtin");
    }

    #[test]
    fn malformed_json_is_error() {
        let err = parse_document(br#"{"a":"#, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, CoreError::Parse { format: "JSON", .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_error() {
        let err = parse_document(&[0x7b, 0xff, 0x7d], DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, CoreError::Encoding { .. }), "{err}");
    }

    #[test]
    fn whitespace_only_is_empty_object() {
        for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
            assert_eq!(parse_document(b"", format).unwrap(), json!({}));
            assert_eq!(parse_document(b"  \n\t", format).unwrap(), json!({}));
        }
    }

    #[test]
    fn yaml_matches_json_equivalent() {
        let yaml = br#"
maxReposToSearch: 42
bitbucketServer:
  - username: u
    token: t
enabled: true
"#;
        let v = parse_document(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(
            v,
            json!({
                "maxReposToSearch": 42,
                "bitbucketServer": [{"username": "u", "token": "t"}],
                "enabled": true
            })
        );
    }

    #[test]
    fn yaml_merge_keys_are_expanded() {
        let yaml = br#"
defaults: &bitbucket
  token: t
  url: https://default.example
bitbucketServer:
  - <<: *bitbucket
    url: https://bitbucket.example
"#;
        let v = parse_document(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(
            v["bitbucketServer"],
            json!([{"token": "t", "url": "https://bitbucket.example"}])
        );
    }

    #[test]
    fn yaml_merge_of_scalar_is_parse_error() {
        let err = parse_document(b"a:\n  <<: 1\n", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, CoreError::Parse { format: "YAML", .. }), "{err}");
    }

    #[test]
    fn yaml_numeric_and_bool_keys_are_stringified() {
        let v = parse_document(b"1: one\ntrue: yes\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(v["1"], "one");
        assert_eq!(v["true"], "yes");
    }

    #[test]
    fn yaml_nan_is_conversion_error() {
        let err = parse_document(b"x: .nan\n", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, CoreError::YamlConversion(_)), "{err}");
    }

    #[test]
    fn malformed_yaml_is_error() {
        let err = parse_document(b"a: [1, 2\n", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, CoreError::Parse { format: "YAML", .. }), "{err}");
    }
}
