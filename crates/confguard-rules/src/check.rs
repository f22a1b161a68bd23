//! Byte-level entry points applying the built-in rule tables to a JSON
//! (or JSON-with-comments) document.

use confguard_core::{parse_document, DocumentFormat};

use crate::error::RuleError;
use crate::ruleset::RuleSet;

/// Check the built-in tagged-union rules.
///
/// # Errors
///
/// Returns [`RuleError::Document`] for malformed bytes and
/// [`RuleError::Discriminator`] for an element that cannot be classified.
pub fn check_tagged_union(document_bytes: &[u8]) -> Result<Vec<String>, RuleError> {
    let document = parse_document(document_bytes, DocumentFormat::Json)?;
    RuleSet::builtin().check_tagged_unions(&document)
}

/// Check the built-in alternative-requirement rules.
///
/// # Errors
///
/// Returns [`RuleError::Document`] for malformed bytes and
/// [`RuleError::UnexpectedShape`] for entries that are not objects.
pub fn check_alternative_requirement(document_bytes: &[u8]) -> Result<Vec<String>, RuleError> {
    let document = parse_document(document_bytes, DocumentFormat::Json)?;
    RuleSet::builtin().check_alternative_requirements(&document)
}

/// Check every built-in rule: tagged unions, then alternative requirements.
///
/// # Errors
///
/// Returns the first [`RuleError`] encountered.
pub fn check_custom(document_bytes: &[u8]) -> Result<Vec<String>, RuleError> {
    let document = parse_document(document_bytes, DocumentFormat::Json)?;
    RuleSet::builtin().check(&document)
}
