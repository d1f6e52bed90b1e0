//! Pure data types for git operations.

/// Individual file status in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    /// Path relative to the repository root.
    pub path: String,
    /// 'M' (modified), 'A' (added), 'D' (deleted), '?' (untracked), 'R' (renamed).
    pub status: char,
    pub staged: bool,
}

/// Parsed `git status --porcelain -b` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    pub branch: Option<String>,
    pub is_clean: bool,
    pub modified_files: Vec<String>,
    pub untracked_files: Vec<String>,
    pub files: Vec<FileStatus>,
}

/// Result of a git commit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// False when nothing was staged.
    pub committed: bool,
    pub message: String,
    pub commit_hash: Option<String>,
}

impl CommitResult {
    pub fn nothing_to_commit() -> Self {
        Self {
            committed: false,
            message: "Nothing to commit".to_string(),
            commit_hash: None,
        }
    }
}
