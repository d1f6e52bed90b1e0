//! In-process remote store.
//!
//! Records every operation in a journal so callers can assert which keys
//! were touched. Reads or writes of selected keys can be made to fail.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::RemoteError;
use crate::remote::{RemoteKind, RemoteStore};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Plain(String),
    Hash(BTreeMap<String, String>),
    Other(String),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Entry>,
    journal: Vec<String>,
    failing_reads: BTreeSet<String>,
    failing_writes: BTreeSet<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plain(&mut self, key: &str, value: &str) {
        self.data
            .insert(key.to_string(), Entry::Plain(value.to_string()));
    }

    /// Adds a field, turning a non-hash key into a hash.
    pub fn insert_hash_field(&mut self, key: &str, field: &str, value: &str) {
        let entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(BTreeMap::new()));
        if !matches!(entry, Entry::Hash(_)) {
            *entry = Entry::Hash(BTreeMap::new());
        }
        if let Entry::Hash(fields) = entry {
            fields.insert(field.to_string(), value.to_string());
        }
    }

    /// Adds a key of a type the sync does not handle, e.g. `list`.
    pub fn insert_other(&mut self, key: &str, type_name: &str) {
        self.data
            .insert(key.to_string(), Entry::Other(type_name.to_string()));
    }

    pub fn plain_value(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Entry::Plain(value)) => Some(value),
            _ => None,
        }
    }

    pub fn hash_value(&self, key: &str, field: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Entry::Hash(fields)) => fields.get(field).map(String::as_str),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Makes every read of `key` fail.
    pub fn fail_reads_on(&mut self, key: &str) {
        self.failing_reads.insert(key.to_string());
    }

    /// Makes every write or delete of `key` fail.
    pub fn fail_writes_on(&mut self, key: &str) {
        self.failing_writes.insert(key.to_string());
    }

    /// Operations in call order, formatted as `OP key` or `OP key field`.
    pub fn journal(&self) -> &[String] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn record(&mut self, operation: &'static str, key: &str, field: Option<&str>) {
        let line = match field {
            Some(field) => format!("{} {} {}", operation, key, field),
            None => format!("{} {}", operation, key),
        };
        self.journal.push(line);
    }

    fn read(
        &mut self,
        operation: &'static str,
        key: &str,
        field: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.record(operation, key, field);
        if self.failing_reads.contains(key) {
            return Err(RemoteError::command(operation, key, "injected read failure"));
        }
        Ok(())
    }

    fn write(
        &mut self,
        operation: &'static str,
        key: &str,
        field: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.record(operation, key, field);
        if self.failing_writes.contains(key) {
            return Err(RemoteError::command(operation, key, "injected write failure"));
        }
        Ok(())
    }

    fn wrong_type(operation: &'static str, key: &str) -> RemoteError {
        RemoteError::command(
            operation,
            key,
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        )
    }
}

impl RemoteStore for MemoryStore {
    fn exists(&mut self, key: &str) -> Result<bool, RemoteError> {
        self.read("EXISTS", key, None)?;
        Ok(self.data.contains_key(key))
    }

    fn kind_of(&mut self, key: &str) -> Result<RemoteKind, RemoteError> {
        self.read("TYPE", key, None)?;
        Ok(match self.data.get(key) {
            None => RemoteKind::None,
            Some(Entry::Plain(_)) => RemoteKind::Plain,
            Some(Entry::Hash(_)) => RemoteKind::Hash,
            Some(Entry::Other(name)) => RemoteKind::Other(name.clone()),
        })
    }

    fn get(&mut self, key: &str) -> Result<Option<String>, RemoteError> {
        self.read("GET", key, None)?;
        match self.data.get(key) {
            None => Ok(None),
            Some(Entry::Plain(value)) => Ok(Some(value.clone())),
            Some(_) => Err(Self::wrong_type("GET", key)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RemoteError> {
        self.write("SET", key, None)?;
        self.insert_plain(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), RemoteError> {
        self.write("DEL", key, None)?;
        self.data.remove(key);
        Ok(())
    }

    fn hash_exists(&mut self, key: &str, field: &str) -> Result<bool, RemoteError> {
        self.read("HEXISTS", key, Some(field))?;
        match self.data.get(key) {
            None => Ok(false),
            Some(Entry::Hash(fields)) => Ok(fields.contains_key(field)),
            Some(_) => Err(Self::wrong_type("HEXISTS", key)),
        }
    }

    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, RemoteError> {
        self.read("HGET", key, Some(field))?;
        match self.data.get(key) {
            None => Ok(None),
            Some(Entry::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(_) => Err(Self::wrong_type("HGET", key)),
        }
    }

    fn hash_set(&mut self, key: &str, field: &str, value: &str) -> Result<(), RemoteError> {
        self.write("HSET", key, Some(field))?;
        match self.data.get(key) {
            None | Some(Entry::Hash(_)) => {
                self.insert_hash_field(key, field, value);
                Ok(())
            }
            Some(_) => Err(Self::wrong_type("HSET", key)),
        }
    }

    fn hash_get_all(&mut self, key: &str) -> Result<BTreeMap<String, String>, RemoteError> {
        self.read("HGETALL", key, None)?;
        match self.data.get(key) {
            None => Ok(BTreeMap::new()),
            Some(Entry::Hash(fields)) => Ok(fields.clone()),
            Some(_) => Err(Self::wrong_type("HGETALL", key)),
        }
    }

    fn hash_delete(&mut self, key: &str, field: &str) -> Result<(), RemoteError> {
        self.write("HDEL", key, Some(field))?;
        let now_empty = match self.data.get_mut(key) {
            None => false,
            Some(Entry::Hash(fields)) => {
                fields.remove(field);
                fields.is_empty()
            }
            Some(_) => return Err(Self::wrong_type("HDEL", key)),
        };
        // the backend drops hashes left without fields
        if now_empty {
            self.data.remove(key);
        }
        Ok(())
    }

    fn list_all_keys(&mut self) -> Result<Vec<String>, RemoteError> {
        self.journal.push("KEYS *".to_string());
        Ok(self.data.keys().cloned().collect())
    }
}
