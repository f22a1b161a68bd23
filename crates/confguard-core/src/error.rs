//! # Error Types
//!
//! Errors raised while turning raw bytes into a document tree. These are
//! failures of the validation call, not findings about the document's
//! content; content findings are [`crate::Problem`]s.

use thiserror::Error;

/// Error raised by the shared document parser.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The input bytes are not valid UTF-8.
    #[error("{format} input is not valid UTF-8: {source}")]
    Encoding {
        /// Name of the format being parsed.
        format: &'static str,
        /// Underlying decode error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The input is not well-formed in its serialization format.
    #[error("malformed {format} input: {reason}")]
    Parse {
        /// Name of the format being parsed.
        format: &'static str,
        /// Parser diagnostic, including line and column where available.
        reason: String,
    },

    /// A YAML document uses a construct that has no JSON equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    YamlConversion(String),
}
