//! # confguard-schema — Schema Conformance
//!
//! Checks configuration documents against a JSON Schema and reports every
//! structural problem: missing required keys, wrong types, values outside
//! an enumeration or pattern, and unknown properties where the schema is
//! closed.
//!
//! ## Usage
//!
//! - [`validate`]: one-shot: schema bytes and document bytes in,
//!   [`confguard_core::ValidationResult`] out.
//! - [`SchemaValidator`]: compile a schema once and validate many
//!   documents, in JSON (with comments) or YAML.
//!
//! ## Crate Policy
//!
//! - Depends only on `confguard-core` internally.
//! - Never performs I/O: schemas and documents arrive as bytes, and `$ref`s
//!   resolve only against schemas registered in memory.

pub mod validate;

pub use jsonschema::Draft;
pub use validate::{validate, SchemaError, SchemaValidator, SchemaValidatorBuilder};
