//! Declared value kinds per address.

use std::collections::HashMap;

use crate::address::Address;
use crate::config::ValueBinding;
use crate::error::ConfigError;
use crate::value::Kind;

/// Read-only lookup of declared kinds, built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    bindings: HashMap<Address, Kind>,
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the registry, rejecting empty keys, unknown kinds and
    /// conflicting duplicates. Identical duplicates are ignored.
    pub fn from_bindings(bindings: &[ValueBinding]) -> Result<Self, ConfigError> {
        let mut registry: HashMap<Address, Kind> = HashMap::with_capacity(bindings.len());

        for binding in bindings {
            if binding.key.is_empty() {
                return Err(ConfigError::EmptyKey);
            }

            let field = binding.field.as_deref().filter(|f| !f.is_empty());
            let kind: Kind = binding
                .kind
                .parse()
                .map_err(|kind| ConfigError::UnsupportedKind {
                    key: binding.key.clone(),
                    field: field.map(str::to_string),
                    kind,
                })?;

            let address = Address::new(binding.key.as_str(), field);
            match registry.get(&address) {
                Some(existing) if *existing == kind => continue,
                Some(existing) => {
                    return Err(ConfigError::ConflictingBinding {
                        key: binding.key.clone(),
                        field: field.map(str::to_string),
                        existing: existing.to_string(),
                        declared: kind.to_string(),
                    });
                }
                None => {
                    registry.insert(address, kind);
                }
            }
        }

        Ok(Self { bindings: registry })
    }

    /// Returns the declared kind and `true`, or `(Kind::String, false)` when
    /// the address has no binding.
    pub fn resolve(&self, key: &str, field: Option<&str>) -> (Kind, bool) {
        self.resolve_address(&Address::new(key, field))
    }

    pub fn resolve_address(&self, address: &Address) -> (Kind, bool) {
        match self.bindings.get(address) {
            Some(kind) => (*kind, true),
            None => (Kind::String, false),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
