//! # Problems and Validation Results
//!
//! A [`Problem`] is a single content defect found in a configuration
//! document. Problems carry no severity: the presence of any problem makes
//! the document invalid.
//!
//! The schema validator returns its problems as a [`ValidationResult`]. The
//! semantic checkers return plain message strings. A [`Report`] holds both
//! and provides the single validity predicate used by callers that need an
//! accept/refuse decision.

use std::fmt;

use serde::Serialize;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// JSON Pointer to the offending node, or `None` when the finding
    /// concerns the document root or the location is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Human-readable description of the defect.
    pub message: String,
}

impl Problem {
    /// Create a problem located at `path`.
    ///
    /// An empty pointer denotes the document root and is stored as "no path".
    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { None } else { Some(path) },
            message: message.into(),
        }
    }

    /// Create a problem with no location.
    pub fn unlocated(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ordered problems produced by the schema validator.
///
/// Zero problems means the document is structurally valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    problems: Vec<Problem>,
}

impl ValidationResult {
    /// Wrap an ordered list of problems.
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    /// Returns every problem, in the order it was found.
    pub fn errors(&self) -> &[Problem] {
        &self.problems
    }

    /// Returns true if no problems were found.
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns the number of problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Returns true if there are no problems.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Iterate over the problems in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.problems.iter()
    }
}

impl FromIterator<Problem> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        Self {
            problems: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Combined outcome of schema validation and semantic checks for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Structural problems from the schema validator.
    pub schema: ValidationResult,
    /// Messages from the semantic rule checkers, in rule then entry order.
    pub semantic: Vec<String>,
}

impl Report {
    /// Combine a schema result with semantic problem messages.
    pub fn new(schema: ValidationResult, semantic: Vec<String>) -> Self {
        Self { schema, semantic }
    }

    /// The single validity predicate: no schema problems and no semantic
    /// problems.
    pub fn is_valid(&self) -> bool {
        self.schema.is_valid() && self.semantic.is_empty()
    }

    /// Total number of problems across both layers.
    pub fn problem_count(&self) -> usize {
        self.schema.len() + self.semantic.len()
    }

    /// Every message, schema problems first, then semantic problems.
    pub fn messages(&self) -> Vec<String> {
        self.schema
            .iter()
            .map(ToString::to_string)
            .chain(self.semantic.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_display_with_path() {
        let p = Problem::at("/maxReposToSearch", r#""x" is not of type "integer""#);
        let display = p.to_string();
        assert!(display.starts_with("/maxReposToSearch: "));
        assert!(display.contains("is not of type"));
    }

    #[test]
    fn problem_empty_pointer_is_root() {
        let p = Problem::at("", r#""maxReposToSearch" is a required property"#);
        assert!(p.path.is_none());
        assert_eq!(p.to_string(), r#""maxReposToSearch" is a required property"#);
    }

    #[test]
    fn validation_result_display_one_line_per_problem() {
        let result: ValidationResult = vec![
            Problem::unlocated("first"),
            Problem::at("/a", "second"),
        ]
        .into_iter()
        .collect();
        assert_eq!(result.to_string(), "first\n/a: second");
        assert_eq!(result.len(), 2);
        assert!(!result.is_valid());
    }

    #[test]
    fn borrowed_iteration_keeps_order() {
        let result = ValidationResult::new(vec![
            Problem::at("/b", "second"),
            Problem::at("/a", "first"),
        ]);
        let mut paths = Vec::new();
        for problem in &result {
            paths.push(problem.path.as_deref());
        }
        assert_eq!(paths, vec![Some("/b"), Some("/a")]);
    }

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::default();
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn report_requires_both_layers_clean() {
        assert!(Report::default().is_valid());

        let schema_only = Report::new(
            ValidationResult::new(vec![Problem::unlocated("bad type")]),
            Vec::new(),
        );
        assert!(!schema_only.is_valid());

        let semantic_only = Report::new(
            ValidationResult::default(),
            vec!["specify either a token or a username/password".to_string()],
        );
        assert!(!semantic_only.is_valid());
    }

    #[test]
    fn report_messages_schema_first() {
        let report = Report::new(
            ValidationResult::new(vec![Problem::at("/x", "schema")]),
            vec!["semantic".to_string()],
        );
        assert_eq!(report.messages(), vec!["/x: schema", "semantic"]);
        assert_eq!(report.problem_count(), 2);
    }

    #[test]
    fn problem_serializes_without_null_path() {
        let json = serde_json::to_value(Problem::unlocated("m")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "m"}));

        let json = serde_json::to_value(Problem::at("/a/0", "m")).unwrap();
        assert_eq!(json, serde_json::json!({"path": "/a/0", "message": "m"}));
    }
}
