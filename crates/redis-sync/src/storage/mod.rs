//! Directory-of-documents representation of the key space.

mod filesystem;

use std::fmt;

use crate::address::Address;

pub use filesystem::{Document, LocalStore, DOCUMENT_NAME};

/// One on-disk document: the root one holding plain keys, or the one of a
/// hash key holding its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    Root,
    Hash(String),
}

impl Container {
    /// The container holding `address`, and the name of its entry there.
    pub fn locate(address: &Address) -> (Container, &str) {
        match address.field() {
            None => (Container::Root, address.key()),
            Some(field) => (Container::Hash(address.key().to_string()), field),
        }
    }

    /// Address of entry `name` in this container.
    pub fn address_of(&self, name: &str) -> Address {
        match self {
            Container::Root => Address::plain(name),
            Container::Hash(key) => Address::hash_field(key.as_str(), name),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Root => f.write_str("root container"),
            Container::Hash(key) => write!(f, "container '{}'", key),
        }
    }
}
