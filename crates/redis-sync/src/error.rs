use std::path::PathBuf;
use thiserror::Error;

use crate::address::Address;
use crate::value::Kind;
use crate::versioning::VersioningError;

/// Namespace printed in front of every error code, e.g. `[ERR-REDIS_SYNC-32]`.
pub const ERROR_NAMESPACE: &str = "REDIS_SYNC";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Sync token of this workspace does not match the token stored in the remote store")]
    TokenMismatch,

    #[error("Type mismatch at {address}: expected '{expected}', got '{actual}'")]
    TypeMismatch {
        address: Address,
        expected: Kind,
        actual: Kind,
    },

    #[error("Invalid {kind} value at {address}: {reason}")]
    InvalidValue {
        address: Address,
        kind: Kind,
        reason: String,
    },

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Local store error: {0}")]
    Local(#[from] LocalStoreError),

    #[error("Could not get user input: {0}")]
    UserInput(String),

    #[error("Versioning error: {0}")]
    Versioning(#[from] VersioningError),
}

impl SyncError {
    /// Stable numeric code used in `[ERR-<namespace>-<code>]` output.
    pub fn code(&self) -> u32 {
        match self {
            SyncError::Config(e) => e.code(),
            SyncError::Workspace(e) => e.code(),
            SyncError::TokenMismatch => 32,
            SyncError::TypeMismatch { .. } => 33,
            SyncError::InvalidValue { .. } => 40,
            SyncError::Remote(e) => e.code(),
            SyncError::Local(e) => e.code(),
            SyncError::UserInput(_) => 17,
            SyncError::Versioning(e) => e.code(),
        }
    }

    /// Returns true for per-item backend failures that `continue_on_error`
    /// may downgrade to a skipped item.
    pub fn is_item_recoverable(&self) -> bool {
        matches!(self, SyncError::Remote(_) | SyncError::Local(_))
    }

    /// Renders the error the way the command line reports it.
    pub fn render(&self) -> String {
        format!("[ERR-{}-{}] {}", ERROR_NAMESPACE, self.code(), self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config value '{name}' must be provided")]
    MissingValue { name: String },

    #[error("Value binding has an empty key")]
    EmptyKey,

    #[error("Unsupported type '{kind}' for key '{key}'{}", field_suffix(.field))]
    UnsupportedKind {
        key: String,
        field: Option<String>,
        kind: String,
    },

    #[error("Conflicting bindings for key '{key}'{}: '{existing}' and '{declared}'", field_suffix(.field))]
    ConflictingBinding {
        key: String,
        field: Option<String>,
        existing: String,
        declared: String,
    },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::ReadFile { .. } => 1,
            ConfigError::ParseJson(_) => 2,
            ConfigError::MissingValue { .. } => 3,
            ConfigError::EmptyKey => 4,
            ConfigError::UnsupportedKind { .. } => 5,
            ConfigError::ConflictingBinding { .. } => 6,
            ConfigError::SchemaValidation { .. } => 8,
            ConfigError::WriteFile { .. } => 10,
        }
    }
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(field) => format!(", field '{}'", field),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("'{0}' is not a sync workspace, run the init command first")]
    NotInitialized(PathBuf),

    #[error("'{0}' is already a sync workspace")]
    AlreadyInitialized(PathBuf),

    #[error("Something changed in the data dir, please commit changes before push")]
    UncommittedChanges,

    #[error("Commit message not provided")]
    EmptyCommitMessage,

    #[error("Sync token file '{0}' is empty")]
    EmptyToken(PathBuf),

    #[error("Failed to read sync token '{path}': {source}")]
    ReadToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write sync token '{path}': {source}")]
    WriteToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

impl WorkspaceError {
    pub fn code(&self) -> u32 {
        match self {
            WorkspaceError::NotInitialized(_) => 11,
            WorkspaceError::AlreadyInitialized(_) => 18,
            WorkspaceError::UncommittedChanges => 22,
            WorkspaceError::EmptyCommitMessage => 23,
            WorkspaceError::EmptyToken(_) => 29,
            WorkspaceError::ReadToken { .. } => 30,
            WorkspaceError::WriteToken { .. } => 31,
            WorkspaceError::CurrentDir(_) => 9,
        }
    }
}

#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("Failed to read data file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse data file '{path}': {message}")]
    ParseDocument { path: PathBuf, message: String },

    #[error("Unsupported value for '{field}' in '{path}': {reason}")]
    UnsupportedValue {
        path: PathBuf,
        field: String,
        reason: String,
    },

    #[error("Failed to write data file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize data file '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove directory '{path}': {source}")]
    RemoveDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file '{0}' is a directory")]
    NotAFile(PathBuf),

    #[error("Failed to scan workspace '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Key '{key}' cannot be stored as a workspace directory: {reason}")]
    InvalidKey { key: String, reason: &'static str },
}

impl LocalStoreError {
    pub fn code(&self) -> u32 {
        match self {
            LocalStoreError::ReadFile { .. } => 12,
            LocalStoreError::ParseDocument { .. } => 13,
            LocalStoreError::UnsupportedValue { .. } => 14,
            LocalStoreError::WriteFile { .. } => 34,
            LocalStoreError::Serialize { .. } => 35,
            LocalStoreError::CreateDirectory { .. } => 36,
            LocalStoreError::RemoveDirectory { .. } => 37,
            LocalStoreError::NotAFile(_) => 38,
            LocalStoreError::Scan { .. } => 39,
            LocalStoreError::InvalidKey { .. } => 41,
        }
    }
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Failed to connect to '{address}': {message}")]
    Connect { address: String, message: String },

    #[error("{operation} failed for key '{key}': {message}")]
    Command {
        operation: &'static str,
        key: String,
        message: String,
    },
}

impl RemoteError {
    pub fn code(&self) -> u32 {
        match self {
            RemoteError::Connect { .. } => 7,
            RemoteError::Command { .. } => 16,
        }
    }

    pub(crate) fn command(
        operation: &'static str,
        key: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        RemoteError::Command {
            operation,
            key: key.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_token_mismatch() {
        let err = SyncError::TokenMismatch;
        assert_eq!(
            err.render(),
            "[ERR-REDIS_SYNC-32] Sync token of this workspace does not match the token stored in the remote store"
        );
    }

    #[test]
    fn test_render_nested_config_error_uses_inner_code() {
        let err = SyncError::from(ConfigError::MissingValue {
            name: "redis.address".to_string(),
        });
        assert_eq!(err.code(), 3);
        assert!(err.render().starts_with("[ERR-REDIS_SYNC-3] "));
        assert!(err.to_string().contains("redis.address"));
    }

    #[test]
    fn test_type_mismatch_message_names_address_and_kinds() {
        let err = SyncError::TypeMismatch {
            address: Address::hash_field("h", "f"),
            expected: Kind::Number,
            actual: Kind::String,
        };
        let message = err.to_string();
        assert!(message.contains("key 'h', field 'f'"));
        assert!(message.contains("expected 'number'"));
        assert!(message.contains("got 'string'"));
    }

    #[test]
    fn test_unsupported_kind_message_with_and_without_field() {
        let plain = ConfigError::UnsupportedKind {
            key: "k".to_string(),
            field: None,
            kind: "int".to_string(),
        };
        assert_eq!(plain.to_string(), "Unsupported type 'int' for key 'k'");

        let hashed = ConfigError::UnsupportedKind {
            key: "k".to_string(),
            field: Some("f".to_string()),
            kind: "int".to_string(),
        };
        assert_eq!(hashed.to_string(), "Unsupported type 'int' for key 'k', field 'f'");
    }

    #[test]
    fn test_only_backend_errors_are_recoverable() {
        assert!(SyncError::from(RemoteError::command("GET", "a", "boom")).is_item_recoverable());
        assert!(!SyncError::TokenMismatch.is_item_recoverable());
        assert!(!SyncError::UserInput("eof".to_string()).is_item_recoverable());
    }
}
