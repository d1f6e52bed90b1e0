//! Version control of the workspace directory.

pub mod error;
pub mod git;

pub use error::VersioningError;
pub use git::{CommitResult, GitRepository};

pub type Result<T> = std::result::Result<T, VersioningError>;

/// Operations the workflows need from version control.
pub trait Versioning {
    /// Creates the repository unless one exists.
    fn init(&self) -> Result<()>;

    /// Human-readable working tree status.
    fn status(&self) -> Result<String>;

    /// Human-readable diff of unstaged changes.
    fn diff(&self) -> Result<String>;

    /// Stages untracked, non-ignored files. Returns how many were staged.
    fn add_untracked(&self) -> Result<usize>;

    /// Stages modified and deleted tracked files. Returns how many were
    /// staged.
    fn add_modified(&self) -> Result<usize>;

    fn commit(&self, message: &str) -> Result<CommitResult>;

    /// Saves all local changes, untracked files included.
    fn stash_save(&self) -> Result<()>;
    fn stash_apply(&self) -> Result<()>;
    fn stash_drop(&self) -> Result<()>;
    fn stash_pop(&self) -> Result<()>;

    fn is_clean(&self) -> Result<bool>;

    /// Drops every uncommitted change in the working tree.
    fn discard_changes(&self) -> Result<()>;
}

/// Keeps uncommitted local edits safe while a pull rewrites the workspace.
///
/// Dirty trees are stashed and the stash is applied right back, so the pull
/// runs on top of the edits. [`StashGuard::release`] forgets the stash once
/// the pull succeeded; [`StashGuard::restore`] resets the tree and brings the
/// edits back after a failure.
pub struct StashGuard<'a> {
    versioning: &'a dyn Versioning,
    stashed: bool,
}

impl<'a> StashGuard<'a> {
    pub fn save(versioning: &'a dyn Versioning) -> Result<Self> {
        let stashed = !versioning.is_clean()?;
        if stashed {
            versioning.stash_save()?;
            if let Err(e) = versioning.stash_apply() {
                log::error!("Failed to reapply stashed local changes: {}", e);
                match versioning.discard_changes().and_then(|_| versioning.stash_pop()) {
                    Ok(()) => log::info!("Restored local changes from the stash"),
                    Err(pop_error) => log::error!(
                        "Local changes remain in the top stash entry (stash@{{0}}): {}",
                        pop_error
                    ),
                }
                return Err(e);
            }
            log::debug!("Stashed local changes");
        }
        Ok(Self {
            versioning,
            stashed,
        })
    }

    pub fn is_stashed(&self) -> bool {
        self.stashed
    }

    pub fn release(self) -> Result<()> {
        if self.stashed {
            self.versioning.stash_drop()?;
        }
        Ok(())
    }

    pub fn restore(self) -> Result<()> {
        self.versioning.discard_changes()?;
        if self.stashed {
            self.versioning.stash_pop()?;
            log::info!("Restored local changes from the stash");
        }
        Ok(())
    }
}
