pub mod address;
pub mod config;
pub mod context;
pub mod error;
pub mod json;
pub mod reconcile;
pub mod registry;
pub mod remote;
pub mod snapshot;
pub mod storage;
pub mod token;
pub mod value;
pub mod versioning;
pub mod workflow;
pub mod workspace;

pub use address::{Address, Shape};
pub use config::{load_config, load_config_from_str, LoadedConfig, RedisConfig, SyncConfig};
pub use context::{SyncContext, SyncOptions};
pub use error::{
    ConfigError, LocalStoreError, RemoteError, Result, SyncError, WorkspaceError, ERROR_NAMESPACE,
};
pub use reconcile::{
    diff, ApplyReport, ChangeItem, ChangeSet, ConflictPolicy, DecisionProvider, InteractivePrompt,
    Reconciler, ScriptedDecisions,
};
pub use registry::TypeRegistry;
pub use remote::{MemoryStore, RedisStore, RemoteKind, RemoteStore};
pub use snapshot::Snapshot;
pub use storage::{Container, LocalStore};
pub use token::{ensure_paired, Pairing, SyncToken, SYNC_TOKEN_KEY};
pub use value::{Kind, TypedValue};
pub use versioning::{GitRepository, StashGuard, Versioning, VersioningError};
pub use workspace::Workspace;
