//! Test harness for isolated workspaces.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use redis_sync::config::ValueBinding;
use redis_sync::versioning::{self, CommitResult, Versioning};
use redis_sync::{SyncConfig, SyncContext, SyncOptions, SyncToken, TypeRegistry, Workspace};

pub const TEST_TOKEN: &str = "0123456789abcdef0123456789abcdef";

/// An initialized workspace in a temp directory.
pub struct TestWorkspace {
    temp_dir: TempDir,
    pub workspace: Workspace,
    bindings: Vec<ValueBinding>,
}

impl TestWorkspace {
    /// Creates a workspace holding [`TEST_TOKEN`] and no bindings.
    pub fn new() -> Self {
        Self::with_bindings(Vec::new())
    }

    pub fn with_bindings(bindings: Vec<ValueBinding>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let workspace = Workspace::new(temp_dir.path());
        workspace
            .write_token(&SyncToken::new(TEST_TOKEN).expect("valid token"))
            .expect("Failed to write token");

        Self {
            temp_dir,
            workspace,
            bindings,
        }
    }

    /// A directory that is not a workspace.
    pub fn uninitialized() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let workspace = Workspace::new(temp_dir.path());
        Self {
            temp_dir,
            workspace,
            bindings: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `content` to a path relative to the workspace root.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root().join(relative)).expect("Failed to read file")
    }

    /// Parsed JSON of a document relative to the workspace root.
    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read_file(relative)).expect("Invalid JSON document")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    pub fn registry(&self) -> TypeRegistry {
        TypeRegistry::from_bindings(&self.bindings).expect("Invalid bindings")
    }

    pub fn context(&self, options: SyncOptions) -> SyncContext {
        let config = SyncConfig {
            value_types: self.bindings.clone(),
            ..SyncConfig::default()
        };
        SyncContext::from_parts(self.workspace.clone(), config, self.registry(), options)
    }
}

/// Versioning fake with a configurable working tree state.
#[derive(Default)]
pub struct RecordingVersioning {
    dirty: Cell<bool>,
    calls: RefCell<Vec<&'static str>>,
}

impl RecordingVersioning {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn dirty() -> Self {
        let versioning = Self::default();
        versioning.dirty.set(true);
        versioning
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }
}

impl Versioning for RecordingVersioning {
    fn init(&self) -> versioning::Result<()> {
        self.record("init");
        Ok(())
    }

    fn status(&self) -> versioning::Result<String> {
        self.record("status");
        Ok(String::new())
    }

    fn diff(&self) -> versioning::Result<String> {
        self.record("diff");
        Ok(String::new())
    }

    fn add_untracked(&self) -> versioning::Result<usize> {
        self.record("add_untracked");
        Ok(0)
    }

    fn add_modified(&self) -> versioning::Result<usize> {
        self.record("add_modified");
        Ok(0)
    }

    fn commit(&self, _message: &str) -> versioning::Result<CommitResult> {
        self.record("commit");
        Ok(CommitResult::nothing_to_commit())
    }

    fn stash_save(&self) -> versioning::Result<()> {
        self.record("stash_save");
        Ok(())
    }

    fn stash_apply(&self) -> versioning::Result<()> {
        self.record("stash_apply");
        Ok(())
    }

    fn stash_drop(&self) -> versioning::Result<()> {
        self.record("stash_drop");
        Ok(())
    }

    fn stash_pop(&self) -> versioning::Result<()> {
        self.record("stash_pop");
        Ok(())
    }

    fn is_clean(&self) -> versioning::Result<bool> {
        self.record("is_clean");
        Ok(!self.dirty.get())
    }

    fn discard_changes(&self) -> versioning::Result<()> {
        self.record("discard_changes");
        Ok(())
    }
}
