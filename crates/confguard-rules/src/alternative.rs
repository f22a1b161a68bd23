//! # Alternative-Requirement Rule
//!
//! A group of credential fields where exactly one *primary* field must be
//! set. *Qualifier* fields may accompany a primary field but never stand in
//! for one.
//!
//! For Bitbucket Server connections the primaries are `password` and
//! `token` and the qualifier is `username`:
//!
//! | set fields            | outcome |
//! |-----------------------|---------|
//! | `password`            | ok      |
//! | `token`               | ok      |
//! | `username, password`  | ok      |
//! | `username, token`     | ok      |
//! | `username`            | problem |
//! | `password, token`     | problem |
//! | none                  | problem |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RuleError;
use crate::lookup::{entry_object, is_present, list_field};

/// Exactly-one-of requirement over the entries of a top-level list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternativeRequirementRule {
    /// Top-level key of the list, e.g. `bitbucketServer`.
    pub field: String,
    /// Name of the entry kind used in messages, e.g. `Bitbucket Server`.
    pub label: String,
    /// Fields of which exactly one must be set.
    pub primary: Vec<String>,
    /// Fields that may accompany a primary field.
    #[serde(default)]
    pub qualifiers: Vec<String>,
    /// Resolution suggested in every problem message.
    pub hint: String,
}

impl AlternativeRequirementRule {
    /// Check every entry of the list; problems are returned in entry order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnexpectedShape`] if the list or one of its
    /// entries has the wrong JSON type.
    pub fn check(&self, document: &Value) -> Result<Vec<String>, RuleError> {
        let Some(entries) = list_field(document, &self.field)? else {
            return Ok(Vec::new());
        };

        let mut problems = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let location = format!("{}[{i}]", self.field);
            let object = entry_object(entry, &location)?;
            if let Some(problem) = self.check_entry(object, &location) {
                problems.push(problem);
            }
        }

        tracing::debug!(
            field = %self.field,
            entries = entries.len(),
            problems = problems.len(),
            "checked alternative requirement"
        );
        Ok(problems)
    }

    fn check_entry(
        &self,
        object: &serde_json::Map<String, Value>,
        location: &str,
    ) -> Option<String> {
        let primaries: Vec<&str> = self
            .primary
            .iter()
            .map(String::as_str)
            .filter(|f| is_present(object, f))
            .collect();

        match primaries.as_slice() {
            [_] => None,
            [] => {
                let qualifiers: Vec<&str> = self
                    .qualifiers
                    .iter()
                    .map(String::as_str)
                    .filter(|f| is_present(object, f))
                    .collect();
                if qualifiers.is_empty() {
                    Some(format!(
                        "{location}: for {}, {} to authenticate",
                        self.label, self.hint
                    ))
                } else {
                    Some(format!(
                        "{location}: for {}, {}; {} alone cannot authenticate",
                        self.label,
                        self.hint,
                        qualifiers.join(" and ")
                    ))
                }
            }
            [_, _] => Some(format!(
                "{location}: for {}, {}, not both ({} are set)",
                self.label,
                self.hint,
                primaries.join(" and ")
            )),
            _ => Some(format!(
                "{location}: for {}, {}, not more than one ({} are set)",
                self.label,
                self.hint,
                primaries.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bitbucket() -> AlternativeRequirementRule {
        AlternativeRequirementRule {
            field: "bitbucketServer".to_string(),
            label: "Bitbucket Server".to_string(),
            primary: vec!["password".to_string(), "token".to_string()],
            qualifiers: vec!["username".to_string()],
            hint: "specify either a token or a username/password".to_string(),
        }
    }

    fn check_one(entry: Value) -> Vec<String> {
        bitbucket().check(&json!({"bitbucketServer": [entry]})).unwrap()
    }

    #[test]
    fn no_credentials() {
        assert_eq!(
            check_one(json!({})),
            vec!["bitbucketServer[0]: for Bitbucket Server, specify either a token or a username/password to authenticate"]
        );
    }

    #[test]
    fn password_and_token() {
        assert_eq!(
            check_one(json!({"password": "p", "token": "t"})),
            vec!["bitbucketServer[0]: for Bitbucket Server, specify either a token or a username/password, not both (password and token are set)"]
        );
    }

    #[test]
    fn username_alone() {
        let problems = check_one(json!({"username": "u"}));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("specify either a token or a username/password"));
        assert!(problems[0].ends_with("username alone cannot authenticate"));
    }

    #[test]
    fn accepted_combinations() {
        for entry in [
            json!({"password": "p"}),
            json!({"token": "t"}),
            json!({"username": "u", "password": "p"}),
            json!({"username": "u", "token": "t"}),
        ] {
            assert!(check_one(entry.clone()).is_empty(), "{entry} should be accepted");
        }
    }

    #[test]
    fn empty_string_counts_as_absent() {
        assert!(check_one(json!({"password": "", "token": "t"})).is_empty());
        assert_eq!(check_one(json!({"token": ""})).len(), 1);
    }

    #[test]
    fn problems_follow_entry_order() {
        let doc = json!({"bitbucketServer": [
            {"token": "t"},
            {},
            {"username": "u", "password": "p"},
            {"password": "p", "token": "t"}
        ]});
        let problems = bitbucket().check(&doc).unwrap();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("bitbucketServer[1]: "));
        assert!(problems[1].starts_with("bitbucketServer[3]: "));
    }

    #[test]
    fn three_primaries_conflict() {
        let mut rule = bitbucket();
        rule.primary.push("appPassword".to_string());
        let problems = rule
            .check(&json!({"bitbucketServer": [{"password": "p", "token": "t", "appPassword": "a"}]}))
            .unwrap();
        assert!(problems[0].contains("not more than one (password, token, appPassword are set)"));
    }

    #[test]
    fn non_object_entry_is_shape_error() {
        let err = bitbucket()
            .check(&json!({"bitbucketServer": [null]}))
            .unwrap_err();
        assert!(matches!(err, RuleError::UnexpectedShape { found: "null", .. }), "{err}");
    }
}
