//! # Rule Tables
//!
//! A [`RuleSet`] is the complete set of semantic rules applied to a
//! document. New variants and new credential groups are added by extending
//! these tables, either in [`RuleSet::builtin`] or in a settings file that
//! deserializes into a `RuleSet`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alternative::AlternativeRequirementRule;
use crate::error::RuleError;
use crate::tagged_union::{TaggedUnionRule, Variant};

/// Tagged-union and alternative-requirement tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Tagged-union rules, checked first.
    #[serde(default)]
    pub tagged_unions: Vec<TaggedUnionRule>,
    /// Alternative-requirement rules, checked after the tagged unions.
    #[serde(default)]
    pub alternatives: Vec<AlternativeRequirementRule>,
}

impl RuleSet {
    /// The built-in rules for site configuration.
    pub fn builtin() -> Self {
        Self {
            tagged_unions: vec![TaggedUnionRule {
                field: "auth.providers".to_string(),
                discriminator: "type".to_string(),
                variants: vec![
                    Variant::new("builtin", &[]),
                    Variant::new("saml", &[]),
                    Variant::new("openidconnect", &["issuer", "clientID", "clientSecret"]),
                    Variant::new("http-header", &["usernameHeader"]),
                    Variant::new("github", &["clientID", "clientSecret"]),
                    Variant::new("gitlab", &["clientID", "clientSecret"]),
                ],
            }],
            alternatives: vec![AlternativeRequirementRule {
                field: "bitbucketServer".to_string(),
                label: "Bitbucket Server".to_string(),
                primary: vec!["password".to_string(), "token".to_string()],
                qualifiers: vec!["username".to_string()],
                hint: "specify either a token or a username/password".to_string(),
            }],
        }
    }

    /// Returns true if the set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.tagged_unions.is_empty() && self.alternatives.is_empty()
    }

    /// Reject tables that cannot be applied meaningfully: empty names,
    /// duplicate variant tags, or a credential group without primaries.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidRuleSet`] describing the first defect.
    pub fn ensure_well_formed(&self) -> Result<(), RuleError> {
        for rule in &self.tagged_unions {
            if rule.field.is_empty() || rule.discriminator.is_empty() {
                return Err(RuleError::InvalidRuleSet(
                    "tagged union rule needs a field and a discriminator".to_string(),
                ));
            }
            if rule.variants.is_empty() {
                return Err(RuleError::InvalidRuleSet(format!(
                    "tagged union '{}' declares no variants",
                    rule.field
                )));
            }
            let mut seen = HashSet::new();
            for variant in &rule.variants {
                if !seen.insert(variant.tag.as_str()) {
                    return Err(RuleError::InvalidRuleSet(format!(
                        "tagged union '{}' declares variant '{}' twice",
                        rule.field, variant.tag
                    )));
                }
            }
        }

        for rule in &self.alternatives {
            if rule.field.is_empty() {
                return Err(RuleError::InvalidRuleSet(
                    "alternative requirement rule needs a field".to_string(),
                ));
            }
            if rule.primary.is_empty() {
                return Err(RuleError::InvalidRuleSet(format!(
                    "alternative requirement '{}' declares no primary fields",
                    rule.field
                )));
            }
            if let Some(both) = rule.qualifiers.iter().find(|q| rule.primary.contains(q)) {
                return Err(RuleError::InvalidRuleSet(format!(
                    "alternative requirement '{}' lists '{both}' as both primary and qualifier",
                    rule.field
                )));
            }
        }
        Ok(())
    }

    /// Apply every tagged-union rule, concatenating problems in table order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RuleError`].
    pub fn check_tagged_unions(&self, document: &Value) -> Result<Vec<String>, RuleError> {
        let mut problems = Vec::new();
        for rule in &self.tagged_unions {
            problems.extend(rule.check(document)?);
        }
        Ok(problems)
    }

    /// Apply every alternative-requirement rule, concatenating problems in
    /// table order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RuleError`].
    pub fn check_alternative_requirements(
        &self,
        document: &Value,
    ) -> Result<Vec<String>, RuleError> {
        let mut problems = Vec::new();
        for rule in &self.alternatives {
            problems.extend(rule.check(document)?);
        }
        Ok(problems)
    }

    /// Apply all rules: tagged unions first, then alternative requirements.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RuleError`]; no problems are returned with it.
    pub fn check(&self, document: &Value) -> Result<Vec<String>, RuleError> {
        let mut problems = self.check_tagged_unions(document)?;
        problems.extend(self.check_alternative_requirements(document)?);
        Ok(problems)
    }
}
