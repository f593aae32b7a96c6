//! Error handling for the promptdeck core.
//!
//! This module defines the main error type `Error` used by the template store and
//! the parameter engine, along with a convenient `Result` type alias. Every variant
//! belongs to one of the categories reported by [`Error::kind`], which is what callers
//! match on when deciding how to surface a failure.
//!
//! # Examples
//!
//! ```
//! use promptdeck::core::error::{Error, ErrorKind, Result};
//!
//! fn require_name(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(Error::validation("template name cannot be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(require_name("  ").unwrap_err().kind(), ErrorKind::Validation);
//! ```

use thiserror::Error;

/// Result type for promptdeck core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for template store and parameter engine operations
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was empty or an operation was used in the wrong mode
    #[error("Validation error: {0}")]
    Validation(String),

    /// No template with the given id exists in the collection
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The session has no placeholder with the given name
    #[error("Unknown placeholder: [{0}]")]
    UnknownPlaceholder(String),

    /// Structural mismatch between an expected and the actual collection shape
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Serialized data could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Consistency,
    Parse,
    Io,
    Config,
}

impl Error {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new template-not-found error
    pub fn template_not_found<S: Into<String>>(id: S) -> Self {
        Self::TemplateNotFound(id.into())
    }

    /// Create a new unknown-placeholder error
    pub fn unknown_placeholder<S: Into<String>>(name: S) -> Self {
        Self::UnknownPlaceholder(name.into())
    }

    /// Create a new consistency error
    pub fn consistency<S: Into<String>>(msg: S) -> Self {
        Self::Consistency(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::TemplateNotFound(_) | Self::UnknownPlaceholder(_) => ErrorKind::NotFound,
            Self::Consistency(_) => ErrorKind::Consistency,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
