use serde::{Deserialize, Serialize};

/// Config file name looked up in the workspace root when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "redis_sync.conf";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(alias = "remoteStore")]
    pub redis: RedisConfig,

    #[serde(default, alias = "valueBindings")]
    pub value_types: Vec<ValueBinding>,
}

/// Connection settings of the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// `host:port`, or a full `redis://` URL.
    #[serde(default)]
    pub address: String,

    /// Database index.
    #[serde(default)]
    pub db: u32,

    /// Password, empty for none.
    #[serde(default)]
    pub auth: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6379".to_string(),
            db: 0,
            auth: String::new(),
        }
    }
}

/// Declares the expected kind of a key, or of one field of a hash key.
///
/// `kind` stays a raw string here so the registry can report unknown kinds
/// together with the offending key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBinding {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
}
