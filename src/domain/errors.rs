//! Domain error types
//!
//! This module defines the error hierarchy for Veil.
//! Errors carry plain strings and never expose third-party types, and
//! no variant ever holds a raw field value.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the application.
/// Configuration errors are fatal and raised before any document is read;
/// malformed input and provider failures are isolated per record.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors (unknown mask type, bad field path,
    /// missing source or sink parameters)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A raw record could not be parsed into a document
    #[error("Malformed input at {location}: {reason}")]
    MalformedInput {
        /// Where the record came from (e.g. `events.json:12`)
        location: String,
        /// Why it was rejected
        reason: String,
    },

    /// A mask provider failed while generating a value or deriving a key
    #[error("Provider '{mask_type}' failed on field '{field}': {reason}")]
    Provider {
        /// Mask type whose provider failed
        mask_type: String,
        /// Field path being masked
        field: String,
        /// Provider error message
        reason: String,
    },

    /// Document source errors
    #[error("Source error: {0}")]
    Source(String),

    /// Document sink errors
    #[error("Sink error: {0}")]
    Sink(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl VeilError {
    /// Returns true if the error only affects a single record and the run
    /// may continue with the next one
    pub fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            VeilError::MalformedInput { .. } | VeilError::Provider { .. }
        )
    }
}

/// Per-document failure detail
///
/// Provides context for a document that was dropped from a run
#[derive(Debug, Clone)]
pub struct DocumentErrorDetail {
    /// Position of the document in the source (1-based)
    pub position: u64,

    /// Field path that failed, if known
    pub field: Option<String>,

    /// Mask type that failed, if known
    pub mask_type: Option<String>,

    /// Error message
    pub message: String,
}

impl From<&VeilError> for DocumentErrorDetail {
    fn from(err: &VeilError) -> Self {
        let (field, mask_type) = match err {
            VeilError::Provider {
                mask_type, field, ..
            } => (Some(field.clone()), Some(mask_type.clone())),
            _ => (None, None),
        };
        Self {
            position: 0,
            field,
            mask_type,
            message: err.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}
