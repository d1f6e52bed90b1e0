use crate::error::{Result, WorkspaceError};
use crate::versioning::{CommitResult, Versioning};
use crate::workspace::Workspace;

/// Stages every new, modified and deleted file and commits it.
pub fn commit(
    workspace: &Workspace,
    versioning: &dyn Versioning,
    message: &str,
) -> Result<CommitResult> {
    workspace.ensure_initialized()?;

    let message = message.trim();
    if message.is_empty() {
        return Err(WorkspaceError::EmptyCommitMessage.into());
    }

    let untracked = versioning.add_untracked()?;
    let modified = versioning.add_modified()?;
    log::debug!("Staged {} new and {} changed file(s)", untracked, modified);

    Ok(versioning.commit(message)?)
}

pub fn status(workspace: &Workspace, versioning: &dyn Versioning) -> Result<String> {
    workspace.ensure_initialized()?;
    Ok(versioning.status()?)
}

pub fn diff(workspace: &Workspace, versioning: &dyn Versioning) -> Result<String> {
    workspace.ensure_initialized()?;
    Ok(versioning.diff()?)
}
