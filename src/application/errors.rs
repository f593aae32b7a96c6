//! Application layer error types

use std::path::PathBuf;
use thiserror::Error;

use crate::core::error::{Error, ErrorKind};

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl ApplicationError {
    /// Category of the underlying core error, if this wraps one
    pub fn core_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Core(e) => Some(e.kind()),
            _ => None,
        }
    }
}
