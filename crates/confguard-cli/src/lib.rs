//! # confguard-cli — Configuration Validation CLI
//!
//! Provides the `confguard` command-line interface over the schema
//! validator and the semantic rule checker.
//!
//! ## Subcommands
//!
//! - `confguard validate`: check documents against a schema and the rule
//!   tables, printing every problem.
//! - `confguard rules`: print the rule tables in effect.
//!
//! ```bash
//! confguard validate --schema site.schema.json site.json
//! confguard --config confguard.yaml validate --format json site.yaml
//! confguard rules --format json
//! ```
//!
//! ## Library Use
//!
//! [`validate_config`] combines both validation layers for callers that
//! load configuration programmatically and need one accept/refuse answer.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the checks themselves.
//! - Handlers return an exit code; only `main` touches the process.

pub mod rules;
pub mod settings;
pub mod validate;

pub use settings::{OutputFormat, Settings};
pub use validate::{check_document, validate_config};
