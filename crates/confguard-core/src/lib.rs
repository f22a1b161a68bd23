//! # confguard-core — Shared Types for Configuration Validation
//!
//! This crate is the leaf of the confguard crate DAG. It defines the value
//! types that the schema validator and the semantic rule checker both
//! produce, and the single document parser they both consume.
//!
//! ## Key Design Principles
//!
//! 1. **Two failure channels.** A [`Problem`] is a content defect that is
//!    reported and aggregated. A [`CoreError`] (and the errors of the
//!    downstream crates) is a failure of the call itself. The two are never
//!    folded into one type.
//!
//! 2. **One parser.** Every component parses documents through
//!    [`parse_document`], so JSONC comments, trailing commas, YAML input and
//!    empty files are handled identically everywhere.
//!
//! 3. **Immutable documents.** Validation borrows the parsed
//!    `serde_json::Value` and never mutates it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `confguard-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod problem;

// Re-export primary types for ergonomic imports.
pub use document::{parse_document, DocumentFormat};
pub use error::CoreError;
pub use problem::{Problem, Report, ValidationResult};
