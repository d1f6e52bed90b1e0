//! Builders for test bindings and remote stores.

#![allow(dead_code)]

use redis_sync::config::ValueBinding;
use redis_sync::{MemoryStore, SYNC_TOKEN_KEY};

use super::harness::TEST_TOKEN;

/// Builder for value binding lists.
#[derive(Default)]
pub struct BindingsBuilder {
    bindings: Vec<ValueBinding>,
}

impl BindingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a plain key.
    pub fn key(mut self, key: &str, kind: &str) -> Self {
        self.bindings.push(ValueBinding {
            key: key.to_string(),
            field: None,
            kind: kind.to_string(),
        });
        self
    }

    /// Binds one field of a hash key.
    pub fn field(mut self, key: &str, field: &str, kind: &str) -> Self {
        self.bindings.push(ValueBinding {
            key: key.to_string(),
            field: Some(field.to_string()),
            kind: kind.to_string(),
        });
        self
    }

    pub fn build(self) -> Vec<ValueBinding> {
        self.bindings
    }
}

/// Builder for pre-filled in-memory remote stores.
pub struct RemoteBuilder {
    store: MemoryStore,
}

impl RemoteBuilder {
    /// An empty store, not yet paired with any workspace.
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// A store already paired with the test workspace token.
    pub fn paired() -> Self {
        Self::new().token(TEST_TOKEN)
    }

    pub fn token(mut self, token: &str) -> Self {
        self.store.insert_plain(SYNC_TOKEN_KEY, token);
        self
    }

    pub fn plain(mut self, key: &str, value: &str) -> Self {
        self.store.insert_plain(key, value);
        self
    }

    pub fn hash(mut self, key: &str, field: &str, value: &str) -> Self {
        self.store.insert_hash_field(key, field, value);
        self
    }

    pub fn other(mut self, key: &str, type_name: &str) -> Self {
        self.store.insert_other(key, type_name);
        self
    }

    pub fn fail_reads_on(mut self, key: &str) -> Self {
        self.store.fail_reads_on(key);
        self
    }

    pub fn fail_writes_on(mut self, key: &str) -> Self {
        self.store.fail_writes_on(key);
        self
    }

    /// The store with an empty journal.
    pub fn build(mut self) -> MemoryStore {
        self.store.clear_journal();
        self.store
    }
}
