//! # Schema Validation
//!
//! Structural validation of configuration documents against a JSON Schema
//! supplied by the caller as bytes.
//!
//! ## Failure Channels
//!
//! A document that disagrees with the schema yields a [`ValidationResult`]
//! holding one [`Problem`] per disagreement. The full document is walked;
//! validation never stops at the first problem. Malformed schema bytes, a
//! schema that cannot be compiled, or malformed document bytes are
//! [`SchemaError`]s instead, because no meaningful result can be produced.
//!
//! ## Schema Resolution
//!
//! The draft is taken from the schema's `$schema` keyword, defaulting to
//! Draft 2020-12. External `$ref`s resolve only against schemas registered
//! with [`SchemaValidatorBuilder::with_resource`]. Nothing is fetched from
//! the network or the filesystem.

use std::collections::HashMap;
use std::fmt;

use confguard_core::{parse_document, DocumentFormat, Problem, ValidationResult};
use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Error that prevents a validation result from being produced.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema bytes are empty or not well-formed JSON.
    #[error("malformed schema: {reason}")]
    SchemaParse {
        /// Parser diagnostic.
        reason: String,
    },

    /// The schema parsed but is not a valid schema, or references a schema
    /// that is not registered.
    #[error("schema compile error: {reason}")]
    SchemaCompile {
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The document bytes could not be parsed.
    #[error("malformed document: {0}")]
    Document(#[from] confguard_core::CoreError),
}

/// Resolves `$ref` URIs to schemas registered in memory.
///
/// Unregistered URIs are refused so that compiling a schema never performs
/// I/O.
struct OfflineRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Resources registered by bare file name match any base URI.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        tracing::warn!(uri = uri_str, "unregistered schema reference");
        Err(format!("schema reference '{uri_str}' is not registered").into())
    }
}

/// Configures and compiles a [`SchemaValidator`].
#[derive(Debug, Default)]
pub struct SchemaValidatorBuilder {
    resources: HashMap<String, Value>,
    draft: Option<Draft>,
}

impl SchemaValidatorBuilder {
    /// Register a schema that the compiled schema may `$ref`.
    ///
    /// `uri` is matched exactly against the reference, or by its final path
    /// segment when registered as a bare file name (`"defs.schema.json"`).
    pub fn with_resource(mut self, uri: impl Into<String>, schema: Value) -> Self {
        self.resources.insert(uri.into(), schema);
        self
    }

    /// Force a draft instead of detecting it from `$schema`.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Parse and compile the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaParse`] if the bytes are empty or not
    /// well-formed, and [`SchemaError::SchemaCompile`] if the schema is
    /// invalid or references an unregistered schema.
    pub fn compile(self, schema_bytes: &[u8]) -> Result<SchemaValidator, SchemaError> {
        if schema_bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(SchemaError::SchemaParse {
                reason: "schema is empty".to_string(),
            });
        }
        let schema = parse_document(schema_bytes, DocumentFormat::Json).map_err(|e| {
            SchemaError::SchemaParse {
                reason: e.to_string(),
            }
        })?;
        self.compile_value(&schema)
    }

    /// Compile an already-parsed schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaCompile`] if the schema is invalid.
    pub fn compile_value(self, schema: &Value) -> Result<SchemaValidator, SchemaError> {
        let mut opts = jsonschema::options();
        if let Some(draft) = self.draft {
            opts.with_draft(draft);
        }
        opts.with_retriever(OfflineRetriever {
            schemas_by_uri: self.resources,
        });

        let validator = opts.build(schema).map_err(|e| SchemaError::SchemaCompile {
            reason: e.to_string(),
        })?;

        let id = schema
            .get("$id")
            .and_then(|v| v.as_str())
            .unwrap_or("(anonymous)");
        tracing::debug!(id, "compiled schema");
        Ok(SchemaValidator { validator })
    }
}

/// A compiled schema, reusable across any number of documents.
///
/// ## Thread Safety
///
/// `SchemaValidator` is `Send + Sync` and holds no per-document state, so one
/// compiled schema can validate documents concurrently.
pub struct SchemaValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Start configuring a validator.
    pub fn builder() -> SchemaValidatorBuilder {
        SchemaValidatorBuilder::default()
    }

    /// Parse and compile a self-contained schema with default options.
    ///
    /// # Errors
    ///
    /// See [`SchemaValidatorBuilder::compile`].
    pub fn compile(schema_bytes: &[u8]) -> Result<Self, SchemaError> {
        Self::builder().compile(schema_bytes)
    }

    /// Validate a parsed document, reporting every structural problem.
    pub fn validate_value(&self, instance: &Value) -> ValidationResult {
        let result: ValidationResult = self
            .validator
            .iter_errors(instance)
            .map(|e| Problem::at(e.instance_path.to_string(), e.to_string()))
            .collect();
        tracing::debug!(problems = result.len(), "schema validation finished");
        result
    }

    /// Parse document bytes and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Document`] if the bytes cannot be parsed.
    pub fn validate_bytes(
        &self,
        document_bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<ValidationResult, SchemaError> {
        let instance = parse_document(document_bytes, format)?;
        Ok(self.validate_value(&instance))
    }

    /// Returns true if the document has no structural problems.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Validate JSON document bytes against JSON schema bytes.
///
/// Equivalent to [`SchemaValidator::compile`] followed by
/// [`SchemaValidator::validate_bytes`]. Callers validating many documents
/// against one schema should compile once instead.
///
/// # Errors
///
/// Returns a [`SchemaError`] if either input is malformed or the schema
/// cannot be compiled.
pub fn validate(
    schema_bytes: &[u8],
    document_bytes: &[u8],
) -> Result<ValidationResult, SchemaError> {
    SchemaValidator::compile(schema_bytes)?.validate_bytes(document_bytes, DocumentFormat::Json)
}
