//! Addresses in the flat remote key/field space.

use std::fmt;

/// Storage shape an address requires on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A plain string key.
    Plain,
    /// A field inside a hash key.
    Hash,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Plain => write!(f, "string"),
            Shape::Hash => write!(f, "hash"),
        }
    }
}

/// A `(key, field?)` pair identifying one storable unit of configuration.
///
/// An absent field denotes a plain key. Empty field names are normalized to
/// `None` so `("k", "")` and `("k",)` are the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    key: String,
    field: Option<String>,
}

impl Address {
    pub fn new(key: impl Into<String>, field: Option<&str>) -> Self {
        Self {
            key: key.into(),
            field: field.filter(|f| !f.is_empty()).map(str::to_string),
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: None,
        }
    }

    pub fn hash_field(key: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            key: key.into(),
            field: if field.is_empty() { None } else { Some(field) },
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn is_plain(&self) -> bool {
        self.field.is_none()
    }

    pub fn shape(&self) -> Shape {
        if self.is_plain() {
            Shape::Plain
        } else {
            Shape::Hash
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "key '{}', field '{}'", self.key, field),
            None => write!(f, "key '{}'", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_is_plain() {
        assert_eq!(Address::new("a", Some("")), Address::plain("a"));
        assert_eq!(Address::hash_field("a", ""), Address::plain("a"));
        assert!(Address::new("a", None).is_plain());
    }

    #[test]
    fn test_shape() {
        assert_eq!(Address::plain("a").shape(), Shape::Plain);
        assert_eq!(Address::hash_field("h", "f").shape(), Shape::Hash);
    }

    #[test]
    fn test_ordering_puts_plain_entry_first() {
        let mut addresses = vec![
            Address::hash_field("a", "x"),
            Address::plain("b"),
            Address::plain("a"),
        ];
        addresses.sort();
        assert_eq!(
            addresses,
            vec![
                Address::plain("a"),
                Address::hash_field("a", "x"),
                Address::plain("b"),
            ]
        );
    }
}
