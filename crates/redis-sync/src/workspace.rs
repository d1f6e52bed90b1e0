//! The local directory a sync runs in.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::WorkspaceError;
use crate::token::SyncToken;

/// Directory marking an initialized workspace.
pub const MARKER_DIR: &str = ".redis_sync";

/// File inside [`MARKER_DIR`] holding the sync token.
pub const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The workspace rooted at the current directory.
    pub fn current() -> Result<Self, WorkspaceError> {
        std::env::current_dir()
            .map(Self::new)
            .map_err(WorkspaceError::CurrentDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn token_path(&self) -> PathBuf {
        self.marker_dir().join(TOKEN_FILE)
    }

    pub fn default_config_path(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.marker_dir().is_dir()
    }

    pub fn ensure_initialized(&self) -> Result<(), WorkspaceError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(WorkspaceError::NotInitialized(self.root.clone()))
        }
    }

    pub fn read_token(&self) -> Result<SyncToken, WorkspaceError> {
        let path = self.token_path();
        let content = fs::read_to_string(&path).map_err(|e| WorkspaceError::ReadToken {
            path: path.clone(),
            source: e,
        })?;

        SyncToken::new(content).ok_or(WorkspaceError::EmptyToken(path))
    }

    /// Writes the token, creating the marker directory when needed.
    pub fn write_token(&self, token: &SyncToken) -> Result<(), WorkspaceError> {
        let path = self.token_path();
        let write_error = |e| WorkspaceError::WriteToken {
            path: path.clone(),
            source: e,
        };

        fs::create_dir_all(self.marker_dir()).map_err(write_error)?;
        fs::write(&path, token.as_str()).map_err(write_error)?;
        Ok(())
    }
}
