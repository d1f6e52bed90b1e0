use crate::context::SyncContext;
use crate::error::{Result, WorkspaceError};
use crate::reconcile::{diff, ApplyReport, DecisionProvider, Reconciler};
use crate::remote::RemoteStore;
use crate::token::ensure_paired;
use crate::versioning::Versioning;

/// Publishes the committed workspace to the remote store.
///
/// Refuses to run on uncommitted edits or against a remote store paired
/// with another workspace; both checks happen before any data is read.
pub fn push(
    ctx: &SyncContext,
    remote: &mut dyn RemoteStore,
    versioning: &dyn Versioning,
    decisions: &mut dyn DecisionProvider,
) -> Result<ApplyReport> {
    ctx.workspace.ensure_initialized()?;

    if !versioning.is_clean()? {
        return Err(WorkspaceError::UncommittedChanges.into());
    }

    let token = ctx.token()?;
    ensure_paired(remote, &token)?;

    let local = ctx.local_store();
    let source = local.enumerate()?;
    let target = remote.snapshot()?;
    let changes = diff(&source, &target);
    log::debug!(
        "Push plan: {} to add, {} to update, {} only remote",
        changes.to_add.len(),
        changes.to_update.len(),
        changes.to_remove.len()
    );

    Reconciler::new(ctx.options.policy(), decisions)
        .with_prune(ctx.options.prune)
        .apply_push(&changes, &source, remote)
}
