//! # confguard-rules — Semantic Configuration Rules
//!
//! Cross-field rules that a JSON Schema cannot express, applied to a parsed
//! configuration document independently of schema validation.
//!
//! ## Rules
//!
//! - [`TaggedUnionRule`]: each element of a list selects a variant through
//!   a discriminator property and must carry that variant's fields.
//! - [`AlternativeRequirementRule`]: exactly one primary credential field
//!   must be set; qualifier fields may accompany it.
//!
//! Both are plain data. A [`RuleSet`] groups them into tables;
//! [`RuleSet::builtin`] holds the rules for site configuration.
//!
//! ## Failure Channels
//!
//! Checks return `Ok(problems)` when the document could be classified, even
//! if it is incomplete. They return `Err(RuleError)` when it could not: a
//! tagged-union element without a recognized discriminator, or a node of
//! the wrong JSON type. An unrecognized discriminator is an error while a
//! missing variant field is a problem, and the distinction is intentional.
//!
//! ## Crate Policy
//!
//! - Depends only on `confguard-core` internally; never on the schema
//!   validator.
//! - Problems are reported in rule-table order, then document order.

pub mod alternative;
pub mod check;
pub mod error;
mod lookup;
pub mod ruleset;
pub mod tagged_union;

pub use alternative::AlternativeRequirementRule;
pub use check::{check_alternative_requirement, check_custom, check_tagged_union};
pub use error::RuleError;
pub use ruleset::RuleSet;
pub use tagged_union::{TaggedUnionRule, Variant};
