//! Error types for the core crate

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while reading a live-state document
///
/// Malformed pipeline fields never end up here: projection and archival
/// degrade those to safe defaults. Only a document that cannot be decoded at
/// all is an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document is not valid JSON or does not match the live-state shape
    #[error("Invalid live-state document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// The document was empty
    #[error("Live-state document is empty")]
    EmptyDocument,
}
