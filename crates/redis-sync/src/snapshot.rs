//! Immutable captures of one store's address space.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::token::SYNC_TOKEN_KEY;

/// Full observable state of a store at one instant: key → ordered
/// `(field?, value)` entries, values in their remote string form.
///
/// The reserved sync-token key is dropped on construction, so it can never
/// take part in a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    containers: BTreeMap<String, BTreeMap<Option<String>, String>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from `(address, value)` pairs. A repeated address
    /// keeps the last value.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Address, String)>,
    {
        let mut containers: BTreeMap<String, BTreeMap<Option<String>, String>> = BTreeMap::new();
        for (address, value) in items {
            if address.key() == SYNC_TOKEN_KEY {
                continue;
            }
            containers
                .entry(address.key().to_string())
                .or_default()
                .insert(address.field().map(str::to_string), value);
        }
        Self { containers }
    }

    pub fn get(&self, address: &Address) -> Option<&str> {
        self.containers
            .get(address.key())?
            .get(&address.field().map(str::to_string))
            .map(String::as_str)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.containers.contains_key(key)
    }

    /// Whether `key` holds at least one hash field.
    pub fn has_fields(&self, key: &str) -> bool {
        self.containers
            .get(key)
            .map(|entries| entries.keys().any(Option::is_some))
            .unwrap_or(false)
    }

    /// Number of addresses.
    pub fn len(&self) -> usize {
        self.containers.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Entries of one key in field order; the plain entry, if any, first.
    pub fn entries(&self, key: &str) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.containers
            .get(key)
            .into_iter()
            .flat_map(|entries| entries.iter())
            .map(|(field, value)| (field.as_deref(), value.as_str()))
    }

    /// All addresses in key order, then field order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, &str)> {
        self.containers.iter().flat_map(|(key, entries)| {
            entries
                .iter()
                .map(move |(field, value)| (Address::new(key.as_str(), field.as_deref()), value.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, field: Option<&str>, value: &str) -> (Address, String) {
        (Address::new(key, field), value.to_string())
    }

    #[test]
    fn test_drops_sync_token_key() {
        let snapshot = Snapshot::from_items(vec![
            item(SYNC_TOKEN_KEY, None, "abc"),
            item("a", None, "1"),
        ]);
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains_key(SYNC_TOKEN_KEY));
    }

    #[test]
    fn test_get_and_contains() {
        let snapshot = Snapshot::from_items(vec![
            item("a", None, "1"),
            item("h", Some("f"), "x"),
        ]);
        assert_eq!(snapshot.get(&Address::plain("a")), Some("1"));
        assert_eq!(snapshot.get(&Address::hash_field("h", "f")), Some("x"));
        assert!(!snapshot.contains(&Address::plain("h")));
        assert!(!snapshot.contains(&Address::hash_field("a", "f")));
    }

    #[test]
    fn test_iter_is_sorted_by_key_then_field() {
        let snapshot = Snapshot::from_items(vec![
            item("h", Some("z"), "3"),
            item("h", Some("a"), "2"),
            item("b", None, "1"),
        ]);
        let addresses: Vec<Address> = snapshot.iter().map(|(address, _)| address).collect();
        assert_eq!(
            addresses,
            vec![
                Address::plain("b"),
                Address::hash_field("h", "a"),
                Address::hash_field("h", "z"),
            ]
        );
    }

    #[test]
    fn test_has_fields() {
        let snapshot = Snapshot::from_items(vec![item("a", None, "1"), item("h", Some("f"), "x")]);
        assert!(!snapshot.has_fields("a"));
        assert!(snapshot.has_fields("h"));
        assert!(!snapshot.has_fields("missing"));
    }

    #[test]
    fn test_repeated_address_keeps_last_value() {
        let snapshot = Snapshot::from_items(vec![item("a", None, "1"), item("a", None, "2")]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&Address::plain("a")), Some("2"));
    }
}
