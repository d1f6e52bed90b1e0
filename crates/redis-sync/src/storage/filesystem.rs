use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::{DirEntry, WalkDir};

use crate::address::Address;
use crate::error::{LocalStoreError, Result, SyncError};
use crate::json::to_pretty_string;
use crate::registry::TypeRegistry;
use crate::snapshot::Snapshot;
use crate::storage::Container;
use crate::value::{Kind, TypedValue};

/// File name of every container document.
pub const DOCUMENT_NAME: &str = "data";

/// Entries of one container document, sorted by name.
pub type Document = BTreeMap<String, TypedValue>;

/// Reads and writes the workspace documents, enforcing declared kinds.
pub struct LocalStore<'a> {
    root: PathBuf,
    registry: &'a TypeRegistry,
}

impl<'a> LocalStore<'a> {
    pub fn new<P: AsRef<Path>>(root: P, registry: &'a TypeRegistry) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Directory of `container`. Hash keys that cannot name a visible
    /// direct subdirectory of the root are rejected before any filesystem
    /// access.
    pub fn container_dir(
        &self,
        container: &Container,
    ) -> std::result::Result<PathBuf, LocalStoreError> {
        match container {
            Container::Root => Ok(self.root.clone()),
            Container::Hash(key) => {
                check_key_name(key)?;
                Ok(self.root.join(key))
            }
        }
    }

    pub fn document_path(
        &self,
        container: &Container,
    ) -> std::result::Result<PathBuf, LocalStoreError> {
        Ok(self.container_dir(container)?.join(DOCUMENT_NAME))
    }

    /// Reads a container document. A missing document is an error.
    pub fn read(&self, container: &Container) -> std::result::Result<Document, LocalStoreError> {
        let path = self.document_path(container)?;
        if path.is_dir() {
            return Err(LocalStoreError::NotAFile(path));
        }

        let content = fs::read_to_string(&path).map_err(|e| LocalStoreError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        parse_document(&path, &content)
    }

    /// Writes a container document, creating its directory when needed.
    pub fn write(
        &self,
        container: &Container,
        document: &Document,
    ) -> std::result::Result<(), LocalStoreError> {
        let dir = self.container_dir(container)?;
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| LocalStoreError::CreateDirectory {
                path: dir.clone(),
                source: e,
            })?;
        }

        let path = dir.join(DOCUMENT_NAME);
        let object: Map<String, Value> = document
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        let content =
            to_pretty_string(&Value::Object(object)).map_err(|e| LocalStoreError::Serialize {
                path: path.clone(),
                source: e,
            })?;

        fs::write(&path, content).map_err(|e| LocalStoreError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        log::debug!("Wrote {} entries to {}", document.len(), path.display());
        Ok(())
    }

    /// Creates an empty document for `container` unless one exists.
    pub fn ensure_exists(&self, container: &Container) -> std::result::Result<(), LocalStoreError> {
        let path = self.document_path(container)?;
        if path.is_dir() {
            return Err(LocalStoreError::NotAFile(path));
        }
        if path.exists() {
            return Ok(());
        }

        self.write(container, &Document::new())
    }

    /// Captures every entry of the workspace.
    ///
    /// The root document supplies plain keys and each visible subdirectory
    /// with a document supplies the fields of the hash key it is named
    /// after. Bound entries of another kind fail the whole enumeration.
    pub fn enumerate(&self) -> Result<Snapshot> {
        let mut items = Vec::new();

        if self.document_path(&Container::Root)?.is_file() {
            self.collect(&Container::Root, &mut items)?;
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(|e| LocalStoreError::Scan {
                path: self.root.clone(),
                source: e,
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(key) = entry.file_name().to_str() else {
                log::warn!("Skipping non UTF-8 directory {}", entry.path().display());
                continue;
            };

            if let Err(e) = check_key_name(key) {
                log::warn!("Skipping directory {}: {}", entry.path().display(), e);
                continue;
            }

            let container = Container::Hash(key.to_string());
            if !self.document_path(&container)?.is_file() {
                continue;
            }
            self.collect(&container, &mut items)?;
        }

        Ok(Snapshot::from_items(items))
    }

    fn collect(&self, container: &Container, items: &mut Vec<(Address, String)>) -> Result<()> {
        for (name, value) in self.read(container)? {
            if name.is_empty() {
                log::warn!("Skipping entry with an empty name in {}", container);
                continue;
            }

            let address = container.address_of(&name);
            self.check_binding(&address, value.kind())?;
            items.push((address, value.to_wire()));
        }
        Ok(())
    }

    fn check_binding(&self, address: &Address, actual: Kind) -> Result<()> {
        let (declared, bound) = self.registry.resolve_address(address);
        if bound && declared != actual {
            return Err(SyncError::TypeMismatch {
                address: address.clone(),
                expected: declared,
                actual,
            });
        }
        Ok(())
    }

    /// Removes a plain key from the root document, or the whole container
    /// of a hash field.
    pub fn remove(&self, address: &Address) -> std::result::Result<(), LocalStoreError> {
        match Container::locate(address) {
            (Container::Root, name) => {
                if !self.document_path(&Container::Root)?.is_file() {
                    return Ok(());
                }
                let mut document = self.read(&Container::Root)?;
                if document.remove(name).is_some() {
                    self.write(&Container::Root, &document)?;
                }
                Ok(())
            }
            (container, _) => self.remove_container(&container),
        }
    }

    /// Removes single fields of a hash container. The container goes away
    /// once it holds no field.
    pub fn remove_fields<I, S>(&self, key: &str, fields: I) -> std::result::Result<(), LocalStoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let container = Container::Hash(key.to_string());
        if !self.document_path(&container)?.is_file() {
            return Ok(());
        }

        let mut document = self.read(&container)?;
        for field in fields {
            document.remove(field.as_ref());
        }

        if document.is_empty() {
            self.remove_container(&container)
        } else {
            self.write(&container, &document)
        }
    }

    fn remove_container(&self, container: &Container) -> std::result::Result<(), LocalStoreError> {
        let dir = self.container_dir(container)?;
        if !dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&dir).map_err(|e| LocalStoreError::RemoveDirectory {
            path: dir.clone(),
            source: e,
        })?;
        log::debug!("Removed {}", dir.display());
        Ok(())
    }

    /// Writes one value, refusing to change the kind declared for the
    /// address or the kind of the value already stored there. On a
    /// mismatch the document is left untouched.
    pub fn store(&self, address: &Address, value: TypedValue) -> Result<()> {
        self.check_binding(address, value.kind())?;

        let (container, name) = Container::locate(address);
        self.ensure_exists(&container)?;

        let mut document = self.read(&container)?;
        if let Some(existing) = document.get(name) {
            if existing.kind() != value.kind() {
                return Err(SyncError::TypeMismatch {
                    address: address.clone(),
                    expected: existing.kind(),
                    actual: value.kind(),
                });
            }
        }

        document.insert(name.to_string(), value);
        self.write(&container, &document)?;
        Ok(())
    }

    /// The value currently stored at `address`, if any.
    pub fn load_value(
        &self,
        address: &Address,
    ) -> std::result::Result<Option<TypedValue>, LocalStoreError> {
        let (container, name) = Container::locate(address);
        if !self.document_path(&container)?.is_file() {
            return Ok(None);
        }

        let mut document = self.read(&container)?;
        Ok(document.remove(name))
    }
}

/// Rejects hash key names that would escape the workspace root, land in a
/// nested or hidden directory, or collide with the root document.
fn check_key_name(key: &str) -> std::result::Result<(), LocalStoreError> {
    let reason = if key.is_empty() {
        "empty name"
    } else if key == "." || key == ".." {
        "relative path component"
    } else if key.contains('/') || key.contains('\\') {
        "contains a path separator"
    } else if key.starts_with('.') {
        "hidden name"
    } else if key == DOCUMENT_NAME {
        "collides with the root document"
    } else {
        return Ok(());
    };

    Err(LocalStoreError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn parse_document(path: &Path, content: &str) -> std::result::Result<Document, LocalStoreError> {
    if content.trim().is_empty() {
        return Ok(Document::new());
    }

    let value: Value =
        serde_json::from_str(content).map_err(|e| LocalStoreError::ParseDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let Value::Object(object) = value else {
        return Err(LocalStoreError::ParseDocument {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        });
    };

    object
        .into_iter()
        .map(|(name, value)| {
            TypedValue::from_json(value)
                .map(|typed| (name.clone(), typed))
                .map_err(|reason| LocalStoreError::UnsupportedValue {
                    path: path.to_path_buf(),
                    field: name,
                    reason,
                })
        })
        .collect()
}
