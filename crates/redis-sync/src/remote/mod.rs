//! Contract over the key-value backend.
//!
//! Values cross this boundary as opaque strings. Kinds are enforced by the
//! type registry and the local store, never by the backend.

pub mod memory;
pub mod redis;

use std::collections::BTreeMap;
use std::fmt;

use crate::address::{Address, Shape};
use crate::error::RemoteError;
use crate::snapshot::Snapshot;
use crate::token::SYNC_TOKEN_KEY;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Backend-observed type of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteKind {
    None,
    Plain,
    Hash,
    /// Any other backend type (list, set, ...), by its backend name.
    Other(String),
}

impl RemoteKind {
    /// Maps a Redis `TYPE` reply.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "none" => RemoteKind::None,
            "string" => RemoteKind::Plain,
            "hash" => RemoteKind::Hash,
            other => RemoteKind::Other(other.to_string()),
        }
    }

    pub fn matches(&self, shape: Shape) -> bool {
        matches!(
            (self, shape),
            (RemoteKind::Plain, Shape::Plain) | (RemoteKind::Hash, Shape::Hash)
        )
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteKind::None => f.write_str("none"),
            RemoteKind::Plain => f.write_str("string"),
            RemoteKind::Hash => f.write_str("hash"),
            RemoteKind::Other(name) => f.write_str(name),
        }
    }
}

pub trait RemoteStore {
    fn exists(&mut self, key: &str) -> Result<bool, RemoteError>;
    fn kind_of(&mut self, key: &str) -> Result<RemoteKind, RemoteError>;
    fn get(&mut self, key: &str) -> Result<Option<String>, RemoteError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), RemoteError>;
    fn delete(&mut self, key: &str) -> Result<(), RemoteError>;

    fn hash_exists(&mut self, key: &str, field: &str) -> Result<bool, RemoteError>;
    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, RemoteError>;
    fn hash_set(&mut self, key: &str, field: &str, value: &str) -> Result<(), RemoteError>;
    fn hash_get_all(&mut self, key: &str) -> Result<BTreeMap<String, String>, RemoteError>;
    fn hash_delete(&mut self, key: &str, field: &str) -> Result<(), RemoteError>;

    fn list_all_keys(&mut self) -> Result<Vec<String>, RemoteError>;

    /// Captures every plain and hash key except the sync token. Keys of
    /// other backend types are skipped.
    fn snapshot(&mut self) -> Result<Snapshot, RemoteError> {
        let mut items = Vec::new();

        for key in self.list_all_keys()? {
            if key == SYNC_TOKEN_KEY {
                continue;
            }

            match self.kind_of(&key)? {
                RemoteKind::Plain => {
                    if let Some(value) = self.get(&key)? {
                        items.push((Address::plain(key), value));
                    }
                }
                RemoteKind::Hash => {
                    for (field, value) in self.hash_get_all(&key)? {
                        items.push((Address::hash_field(key.as_str(), field), value));
                    }
                }
                RemoteKind::None => {}
                RemoteKind::Other(name) => {
                    log::debug!("Skipping key '{}' of unsupported type '{}'", key, name);
                }
            }
        }

        Ok(Snapshot::from_items(items))
    }
}
