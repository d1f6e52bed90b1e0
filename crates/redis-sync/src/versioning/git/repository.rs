//! Git repository operations.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::parse::{format_git_error, parse_porcelain_status, split_nul};
use super::types::*;
use crate::versioning::{Result, Versioning, VersioningError};

/// Identity used for commits when git has none configured.
const DEFAULT_USER_NAME: &str = "redis-sync";
const DEFAULT_USER_EMAIL: &str = "redis-sync@localhost";

const STASH_MESSAGE: &str = "redis-sync pull";

/// Runs the `git` binary inside the workspace root.
pub struct GitRepository {
    repo_path: PathBuf,
}

impl GitRepository {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Checks if the directory is a git repository.
    pub fn is_git_repo(&self) -> bool {
        self.repo_path.join(".git").exists()
    }

    /// Checks if the repository has any commits.
    pub fn has_commits(&self) -> bool {
        if !self.is_git_repo() {
            return false;
        }

        self.run_git(&["rev-parse", "--verify", "HEAD"])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Parsed porcelain status of the working tree.
    pub fn porcelain_status(&self) -> Result<GitStatus> {
        self.ensure_repo()?;
        let output = self.run_checked(&["status", "--porcelain", "-b"])?;
        Ok(parse_porcelain_status(&String::from_utf8_lossy(&output.stdout)))
    }

    fn ensure_repo(&self) -> Result<()> {
        if self.is_git_repo() {
            Ok(())
        } else {
            Err(VersioningError::NotARepository(self.repo_path.clone()))
        }
    }

    /// Sets a commit identity unless git already resolves one.
    fn ensure_identity(&self) -> Result<()> {
        for (key, value) in [
            ("user.email", DEFAULT_USER_EMAIL),
            ("user.name", DEFAULT_USER_NAME),
        ] {
            let configured = self
                .run_git(&["config", key])
                .map(|output| output.status.success())
                .unwrap_or(false);
            if !configured {
                self.run_checked(&["config", key, value])?;
            }
        }
        Ok(())
    }

    fn stage(&self, files: &[String]) -> Result<usize> {
        if files.is_empty() {
            return Ok(0);
        }

        let mut args = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        self.run_checked(&args)?;
        log::debug!("Staged {} file(s)", files.len());
        Ok(files.len())
    }

    fn run_stash(&self, operation: &'static str, args: &[&str]) -> Result<()> {
        self.ensure_repo()?;
        let output = self.run_git(args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(VersioningError::Stash {
                operation,
                message: format_git_error(&output),
            })
        }
    }

    /// Runs a git command and fails on a non-zero exit status.
    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run_git(args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(VersioningError::Command {
                command: args.join(" "),
                message: format_git_error(&output),
            })
        }
    }

    /// Runs a git command in the repository directory.
    fn run_git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()
            .map_err(|e| VersioningError::Spawn {
                command: args.join(" "),
                source: e,
            })
    }
}

impl Versioning for GitRepository {
    fn init(&self) -> Result<()> {
        if !self.is_git_repo() {
            self.run_checked(&["init"])?;
            log::info!("Initialized git repository in {}", self.repo_path.display());
        }
        self.ensure_identity()
    }

    fn status(&self) -> Result<String> {
        self.ensure_repo()?;
        let output = self.run_checked(&["status"])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn diff(&self) -> Result<String> {
        self.ensure_repo()?;
        let output = self.run_checked(&["diff"])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn add_untracked(&self) -> Result<usize> {
        self.ensure_repo()?;
        let output = self.run_checked(&["ls-files", "--others", "--exclude-standard", "-z"])?;
        self.stage(&split_nul(&output.stdout))
    }

    fn add_modified(&self) -> Result<usize> {
        self.ensure_repo()?;
        let output = self.run_checked(&["ls-files", "--modified", "-z"])?;
        let mut files = split_nul(&output.stdout);
        // deleted files are listed as modified too
        files.dedup();
        self.stage(&files)
    }

    fn commit(&self, message: &str) -> Result<CommitResult> {
        let status = self.porcelain_status()?;
        if !status.files.iter().any(|file| file.staged) {
            return Ok(CommitResult::nothing_to_commit());
        }

        self.ensure_identity()?;
        let output = self.run_git(&["commit", "-m", message])?;
        if !output.status.success() {
            return Err(VersioningError::Commit(format_git_error(&output)));
        }

        let hash_output = self.run_checked(&["rev-parse", "--short", "HEAD"])?;
        let commit_hash = String::from_utf8_lossy(&hash_output.stdout)
            .trim()
            .to_string();
        log::info!("Committed {}", commit_hash);

        Ok(CommitResult {
            committed: true,
            message: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            commit_hash: Some(commit_hash),
        })
    }

    fn stash_save(&self) -> Result<()> {
        self.run_stash(
            "save",
            &["stash", "push", "--include-untracked", "-m", STASH_MESSAGE],
        )
    }

    fn stash_apply(&self) -> Result<()> {
        self.run_stash("apply", &["stash", "apply"])
    }

    fn stash_drop(&self) -> Result<()> {
        self.run_stash("drop", &["stash", "drop"])
    }

    fn stash_pop(&self) -> Result<()> {
        self.run_stash("pop", &["stash", "pop"])
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.porcelain_status()?.is_clean)
    }

    fn discard_changes(&self) -> Result<()> {
        self.ensure_repo()?;
        if self.has_commits() {
            self.run_git(&["reset", "--hard", "HEAD"])
                .and_then(|output| check_restore(&output))?;
        }
        self.run_git(&["clean", "-fd"])
            .and_then(|output| check_restore(&output))
    }
}

fn check_restore(output: &Output) -> Result<()> {
    if output.status.success() {
        Ok(())
    } else {
        Err(VersioningError::Restore(format_git_error(output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepository) {
        let dir = TempDir::new().unwrap();
        let repo = GitRepository::new(dir.path());
        repo.init().unwrap();
        (dir, repo)
    }

    fn commit_all(repo: &GitRepository, message: &str) -> CommitResult {
        repo.add_untracked().unwrap();
        repo.add_modified().unwrap();
        repo.commit(message).unwrap()
    }

    #[test]
    fn test_is_git_repo_false() {
        let dir = TempDir::new().unwrap();
        let repo = GitRepository::new(dir.path());
        assert!(!repo.is_git_repo());
        assert!(matches!(
            repo.is_clean(),
            Err(VersioningError::NotARepository(_))
        ));
    }

    #[test]
    fn test_init_and_is_git_repo() {
        let (_dir, repo) = init_repo();
        assert!(repo.is_git_repo());
        assert!(!repo.has_commits());
        // running it twice is harmless
        repo.init().unwrap();
    }

    #[test]
    fn test_status_with_untracked_file() {
        let (dir, repo) = init_repo();
        assert!(repo.is_clean().unwrap());

        fs::write(dir.path().join("data"), "{}\n").unwrap();

        let status = repo.porcelain_status().unwrap();
        assert!(!status.is_clean);
        assert!(status.untracked_files.contains(&"data".to_string()));
        assert!(repo.status().unwrap().contains("data"));
    }

    #[test]
    fn test_commit_and_nothing_to_commit() {
        let (dir, repo) = init_repo();
        fs::create_dir_all(dir.path().join("h")).unwrap();
        fs::write(dir.path().join("h").join("data"), "{}\n").unwrap();

        let result = commit_all(&repo, "first");
        assert!(result.committed);
        assert!(result.commit_hash.is_some());
        assert!(repo.is_clean().unwrap());

        let result = commit_all(&repo, "again");
        assert!(!result.committed);
        assert_eq!(result.message, "Nothing to commit");
    }

    #[test]
    fn test_add_modified_stages_edits_and_deletions() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a"), "1").unwrap();
        fs::write(dir.path().join("b"), "2").unwrap();
        commit_all(&repo, "first");

        fs::write(dir.path().join("a"), "changed").unwrap();
        fs::remove_file(dir.path().join("b")).unwrap();
        assert!(repo.diff().unwrap().contains("changed"));

        assert_eq!(repo.add_modified().unwrap(), 2);
        assert!(repo.commit("second").unwrap().committed);
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn test_stash_round_trip() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("data"), "{}\n").unwrap();
        commit_all(&repo, "first");

        fs::write(dir.path().join("data"), "{\"a\": 1}\n").unwrap();
        fs::write(dir.path().join("extra"), "x").unwrap();

        repo.stash_save().unwrap();
        assert!(repo.is_clean().unwrap());
        assert!(!dir.path().join("extra").exists());

        repo.stash_apply().unwrap();
        assert!(dir.path().join("extra").exists());

        // simulate a failed pull, then bring the edits back
        fs::write(dir.path().join("data"), "{\"broken\": true}\n").unwrap();
        repo.discard_changes().unwrap();
        assert!(repo.is_clean().unwrap());

        repo.stash_pop().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("data")).unwrap(),
            "{\"a\": 1}\n"
        );
        assert!(dir.path().join("extra").exists());
    }

    #[test]
    fn test_stash_failure_is_reported() {
        let (_dir, repo) = init_repo();
        let err = repo.stash_pop().unwrap_err();
        assert!(matches!(err, VersioningError::Stash { operation: "pop", .. }));
    }
}
