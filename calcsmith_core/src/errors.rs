//! # Error Types
//!
//! Structured error types for calcsmith_core. Generation-time failures carry
//! enough context for an operator to locate the offending descriptor without
//! re-running with extra flags.
//!
//! ## Example
//!
//! ```rust
//! use calcsmith_core::errors::{SiteError, SiteResult};
//!
//! fn validate_slug(slug: &str) -> SiteResult<()> {
//!     if slug.is_empty() {
//!         return Err(SiteError::invalid_key(slug, "slug must not be empty"));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calcsmith_core operations
pub type SiteResult<T> = Result<T, SiteError>;

/// Structured error type for store loading and source generation.
///
/// Each variant provides specific context about what went wrong. The
/// build-fatal variants abort the generation pass; see [`SiteError::is_build_fatal`].
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SiteError {
    /// The descriptor store document could not be parsed as the schema
    #[error("Malformed store: {reason}")]
    MalformedStore { reason: String },

    /// Two descriptors collide on `id` or `slug` (case-insensitive)
    #[error("Duplicate {kind}: '{value}'")]
    DuplicateKey { kind: String, value: String },

    /// Two distinct raw keys derive the same identifier
    #[error("Duplicate derived identifier '{identifier}' from '{first}' and '{second}'")]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },

    /// A key contains characters the identifier deriver cannot accept
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// `metadata.total_calculators` disagrees with the actual count
    #[error("Store metadata claims {declared} calculators, found {actual}")]
    MetadataMismatch { declared: usize, actual: usize },

    /// A category's declared count disagrees with the actual tally
    #[error("Category '{category}' claims {declared} calculators, found {actual}")]
    CategoryCountMismatch {
        category: String,
        declared: usize,
        actual: usize,
    },

    /// File I/O error during the generation pass
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SiteError {
    /// Create a MalformedStore error
    pub fn malformed_store(reason: impl Into<String>) -> Self {
        SiteError::MalformedStore {
            reason: reason.into(),
        }
    }

    /// Create a DuplicateKey error
    pub fn duplicate_key(kind: impl Into<String>, value: impl Into<String>) -> Self {
        SiteError::DuplicateKey {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create a DuplicateIdentifier error
    pub fn duplicate_identifier(
        identifier: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        SiteError::DuplicateIdentifier {
            identifier: identifier.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an InvalidKey error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SiteError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SiteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort the generation pass with a nonzero exit.
    ///
    /// Everything except file I/O is a data defect the operator has to fix in
    /// the store; file errors are environmental but still abort (the pass is
    /// all-or-nothing either way).
    pub fn is_build_fatal(&self) -> bool {
        !matches!(self, SiteError::FileError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SiteError::MalformedStore { .. } => "MALFORMED_STORE",
            SiteError::DuplicateKey { .. } => "DUPLICATE_KEY",
            SiteError::DuplicateIdentifier { .. } => "DUPLICATE_IDENTIFIER",
            SiteError::InvalidKey { .. } => "INVALID_KEY",
            SiteError::MetadataMismatch { .. } => "METADATA_MISMATCH",
            SiteError::CategoryCountMismatch { .. } => "CATEGORY_COUNT_MISMATCH",
            SiteError::FileError { .. } => "FILE_ERROR",
            SiteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
