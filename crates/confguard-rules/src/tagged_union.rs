//! # Tagged-Union Rule
//!
//! A list whose elements are objects of several kinds, told apart by a
//! discriminator property (`"type"` for `auth.providers`). Each variant may
//! require fields of its own.
//!
//! An element whose discriminator is missing or names no declared variant
//! cannot be classified, so the check fails with
//! [`RuleError::Discriminator`]. An element that is classified but lacks a
//! field its variant requires yields a problem string and checking continues.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RuleError;
use crate::lookup::{entry_object, is_present, list_field};

/// One variant of a tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    /// Discriminator value selecting this variant.
    pub tag: String,
    /// Fields an element of this variant must carry.
    #[serde(default)]
    pub required: Vec<String>,
}

impl Variant {
    /// Build a variant from static strings.
    pub fn new(tag: &str, required: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            required: required.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A top-level list field holding tagged-union elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedUnionRule {
    /// Top-level key of the list, e.g. `auth.providers`.
    pub field: String,
    /// Property naming the variant, e.g. `type`.
    pub discriminator: String,
    /// Declared variants, in the order they are listed in diagnostics.
    pub variants: Vec<Variant>,
}

impl TaggedUnionRule {
    /// Look up the variant selected by `tag`.
    pub fn variant(&self, tag: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.tag == tag)
    }

    /// Every declared tag, in table order.
    pub fn tags(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.tag.clone()).collect()
    }

    /// Check every element of the list in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Discriminator`] for the first element that
    /// cannot be classified, and [`RuleError::UnexpectedShape`] if the list
    /// or one of its elements has the wrong JSON type.
    pub fn check(&self, document: &Value) -> Result<Vec<String>, RuleError> {
        let Some(elements) = list_field(document, &self.field)? else {
            return Ok(Vec::new());
        };

        let mut problems = Vec::new();
        for (i, element) in elements.iter().enumerate() {
            let location = format!("{}[{i}]", self.field);
            let object = entry_object(element, &location)?;

            let tag = object.get(&self.discriminator);
            let Some(variant) = tag.and_then(Value::as_str).and_then(|t| self.variant(t)) else {
                return Err(RuleError::Discriminator {
                    location,
                    discriminator: self.discriminator.clone(),
                    found: tag.map(Value::to_string),
                    allowed: self.tags(),
                });
            };

            let missing: Vec<&str> = variant
                .required
                .iter()
                .map(String::as_str)
                .filter(|f| !is_present(object, f))
                .collect();
            if !missing.is_empty() {
                problems.push(format!(
                    "{location}: {} \"{}\" is missing required field(s): {}",
                    self.discriminator,
                    variant.tag,
                    missing.join(", ")
                ));
            }
        }

        tracing::debug!(
            field = %self.field,
            elements = elements.len(),
            problems = problems.len(),
            "checked tagged union"
        );
        Ok(problems)
    }
}
