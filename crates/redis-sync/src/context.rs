//! Per-command execution state.

use std::path::Path;

use crate::config::{load_config, LoadedConfig, SyncConfig};
use crate::error::{Result, WorkspaceError};
use crate::reconcile::ConflictPolicy;
use crate::registry::TypeRegistry;
use crate::storage::LocalStore;
use crate::token::SyncToken;
use crate::workspace::Workspace;

/// Flags of a push or pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Write over differing targets without asking.
    pub overwrite: bool,
    /// Skip items whose target cannot be read or written.
    pub continue_on_error: bool,
    /// Delete remote addresses missing locally on push.
    pub prune: bool,
    /// Token used instead of the one stored in the workspace.
    pub token: Option<String>,
}

impl SyncOptions {
    pub fn policy(&self) -> ConflictPolicy {
        ConflictPolicy::new(self.overwrite, self.continue_on_error)
    }
}

/// Everything a workflow needs, built once per command.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub workspace: Workspace,
    pub config: SyncConfig,
    pub registry: TypeRegistry,
    pub options: SyncOptions,
}

impl SyncContext {
    /// Loads the configuration of an initialized workspace, from
    /// `config_path` or the default file in the workspace root.
    pub fn load(
        workspace: Workspace,
        config_path: Option<&Path>,
        options: SyncOptions,
    ) -> Result<Self> {
        workspace.ensure_initialized()?;

        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| workspace.default_config_path());
        log::debug!("Loading config from {}", path.display());
        let LoadedConfig { config, registry } = load_config(&path)?;

        Ok(Self::from_parts(workspace, config, registry, options))
    }

    pub fn from_parts(
        workspace: Workspace,
        config: SyncConfig,
        registry: TypeRegistry,
        options: SyncOptions,
    ) -> Self {
        Self {
            workspace,
            config,
            registry,
            options,
        }
    }

    pub fn local_store(&self) -> LocalStore<'_> {
        LocalStore::new(self.workspace.root(), &self.registry)
    }

    /// The token override, or the token stored in the workspace.
    pub fn token(&self) -> Result<SyncToken> {
        match &self.options.token {
            Some(token) => SyncToken::new(token)
                .ok_or_else(|| WorkspaceError::EmptyToken(self.workspace.token_path()).into()),
            None => Ok(self.workspace.read_token()?),
        }
    }
}
