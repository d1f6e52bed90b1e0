//! Versioning collaborator error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersioningError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Failed to run 'git {command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'git {command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Stash {operation} failed: {message}")]
    Stash {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to restore the working tree: {0}")]
    Restore(String),
}

impl VersioningError {
    pub fn code(&self) -> u32 {
        match self {
            VersioningError::NotARepository(_) => 19,
            VersioningError::Spawn { .. } => 20,
            VersioningError::Command { .. } => 21,
            VersioningError::Commit(_) => 24,
            VersioningError::Stash { .. } => 25,
            VersioningError::Restore(_) => 26,
        }
    }
}
