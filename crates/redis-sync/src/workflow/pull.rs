use crate::context::SyncContext;
use crate::error::Result;
use crate::reconcile::{diff, ApplyReport, DecisionProvider, Reconciler};
use crate::remote::RemoteStore;
use crate::token::ensure_paired;
use crate::versioning::{StashGuard, Versioning};

/// Brings the remote state into the workspace.
///
/// Uncommitted local edits are stashed first. When the pull fails the
/// workspace is reset and the edits are restored.
pub fn pull(
    ctx: &SyncContext,
    remote: &mut dyn RemoteStore,
    versioning: &dyn Versioning,
    decisions: &mut dyn DecisionProvider,
) -> Result<ApplyReport> {
    ctx.workspace.ensure_initialized()?;

    let token = ctx.token()?;
    ensure_paired(remote, &token)?;

    let source = remote.snapshot()?;
    let local = ctx.local_store();
    let target = local.enumerate()?;
    let changes = diff(&source, &target);
    log::debug!(
        "Pull plan: {} to add, {} to update, {} to remove",
        changes.to_add.len(),
        changes.to_update.len(),
        changes.to_remove.len()
    );

    let guard = StashGuard::save(versioning)?;
    let applied = Reconciler::new(ctx.options.policy(), decisions)
        .apply_pull(&changes, &source, &local);

    match applied {
        Ok(report) => {
            guard.release()?;
            Ok(report)
        }
        Err(e) => {
            log::warn!("Pull failed, restoring the workspace: {}", e);
            if let Err(restore_error) = guard.restore() {
                log::error!("Failed to restore the workspace: {}", restore_error);
            }
            Err(e)
        }
    }
}
