//! # Rule Errors
//!
//! Failures that prevent the semantic rules from classifying a document.
//! A document that can be classified but is incomplete produces problem
//! strings instead; see the crate documentation.

use thiserror::Error;

/// Error raised when a document cannot be checked against the rule tables.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The document bytes could not be parsed.
    #[error("malformed document: {0}")]
    Document(#[from] confguard_core::CoreError),

    /// A node the rules need to inspect has the wrong JSON type.
    #[error("{location}: expected {expected}, found {found}")]
    UnexpectedShape {
        /// Where the node was found, e.g. `bitbucketServer[2]`.
        location: String,
        /// JSON type the rule requires.
        expected: &'static str,
        /// JSON type actually present.
        found: &'static str,
    },

    /// A tagged-union element has no discriminator, or one that names no
    /// declared variant.
    #[error(
        "{location}: tagged union type must have a \"{discriminator}\" property \
         whose value is one of [{}]; {}",
        .allowed.join(", "),
        found_clause(.found)
    )]
    Discriminator {
        /// Where the element was found, e.g. `auth.providers[0]`.
        location: String,
        /// Name of the discriminator property.
        discriminator: String,
        /// JSON rendering of the discriminator value, if one was present.
        found: Option<String>,
        /// Every declared variant tag, in table order.
        allowed: Vec<String>,
    },

    /// A rule table is internally inconsistent.
    #[error("invalid rule table: {0}")]
    InvalidRuleSet(String),
}

fn found_clause(found: &Option<String>) -> String {
    match found {
        Some(value) => format!("found {value}"),
        None => "the property is missing".to_string(),
    }
}
