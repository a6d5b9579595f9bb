//! Error types for the placeholder engine.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while configuring the engine
///
/// Scanning and substituting never fail on document content; only an
/// unusable configuration is an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Placeholder delimiters are unusable
    #[error("Invalid placeholder syntax: {0}")]
    InvalidSyntax(String),

    /// Currency convention for the consistency checker is unusable
    #[error("Invalid currency convention: {0}")]
    InvalidConvention(String),

    /// A pattern built from the configuration failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
