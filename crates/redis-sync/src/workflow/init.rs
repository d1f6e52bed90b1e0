use crate::config::{save_config, SyncConfig};
use crate::error::{Result, WorkspaceError};
use crate::registry::TypeRegistry;
use crate::storage::{Container, LocalStore};
use crate::token::SyncToken;
use crate::versioning::{CommitResult, Versioning};
use crate::workspace::Workspace;

pub const INIT_COMMIT_MESSAGE: &str = "data workdir initialized";

#[derive(Debug, Clone)]
pub struct InitReport {
    pub token: SyncToken,
    pub commit: CommitResult,
}

/// Turns `workspace` into a sync workspace under version control.
///
/// Writes the token (the given one, or a fresh one), a default config file
/// unless one exists, and an empty root document, then commits all of it.
pub fn init(
    workspace: &Workspace,
    token: Option<&str>,
    versioning: &dyn Versioning,
) -> Result<InitReport> {
    if workspace.is_initialized() {
        return Err(WorkspaceError::AlreadyInitialized(workspace.root().to_path_buf()).into());
    }

    let token = token
        .and_then(SyncToken::new)
        .unwrap_or_else(SyncToken::generate);
    workspace.write_token(&token)?;

    let config_path = workspace.default_config_path();
    if !config_path.exists() {
        save_config(&config_path, &SyncConfig::default())?;
    }

    let registry = TypeRegistry::empty();
    LocalStore::new(workspace.root(), &registry).ensure_exists(&Container::Root)?;

    versioning.init()?;
    versioning.add_untracked()?;
    let commit = versioning.commit(INIT_COMMIT_MESSAGE)?;

    log::info!("Initialized sync workspace in {}", workspace.root().display());
    Ok(InitReport { token, commit })
}
