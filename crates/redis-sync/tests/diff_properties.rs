//! Property-based tests for snapshot diffing and value encoding.
//!
//! Run with: `cargo test --test diff_properties`

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use serde_json::Value;

use redis_sync::{diff, Address, Kind, Snapshot, TypedValue};

// =============================================================================
// Strategies
// =============================================================================

/// Small alphabets so generated snapshots overlap often.
fn item_strategy() -> impl Strategy<Value = (Address, String)> {
    (
        "[a-d]",
        prop::option::of("[x-z]"),
        "[0-2]",
    )
        .prop_map(|(key, field, value)| (Address::new(key, field.as_deref()), value))
}

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(item_strategy(), 0..12).prop_map(Snapshot::from_items)
}

fn scalar_json_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::String),
    ]
}

fn addresses(items: &[redis_sync::ChangeItem]) -> BTreeSet<Address> {
    items.iter().map(|item| item.address.clone()).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn diff_of_snapshot_with_itself_is_empty(snapshot in snapshot_strategy()) {
        prop_assert!(diff(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn diff_lists_are_disjoint(source in snapshot_strategy(), target in snapshot_strategy()) {
        let changes = diff(&source, &target);
        let added = addresses(&changes.to_add);
        let removed = addresses(&changes.to_remove);
        let updated = addresses(&changes.to_update);

        prop_assert!(added.is_disjoint(&removed));
        prop_assert!(added.is_disjoint(&updated));
        prop_assert!(removed.is_disjoint(&updated));
    }

    #[test]
    fn diff_classifies_every_address(source in snapshot_strategy(), target in snapshot_strategy()) {
        let changes = diff(&source, &target);

        for item in &changes.to_add {
            prop_assert!(source.contains(&item.address));
            prop_assert!(!target.contains(&item.address));
        }
        for item in &changes.to_remove {
            prop_assert!(!source.contains(&item.address));
            prop_assert!(target.contains(&item.address));
        }
        for item in &changes.to_update {
            prop_assert_eq!(source.get(&item.address), Some(item.value.as_str()));
            prop_assert_ne!(target.get(&item.address), Some(item.value.as_str()));
        }

        let unchanged = source
            .iter()
            .filter(|(address, value)| target.get(address) == Some(*value))
            .count();
        prop_assert_eq!(
            unchanged + changes.to_add.len() + changes.to_update.len(),
            source.len()
        );
    }

    #[test]
    fn applying_diff_reproduces_source(source in snapshot_strategy(), target in snapshot_strategy()) {
        let changes = diff(&source, &target);

        let mut state: BTreeMap<Address, String> = target
            .iter()
            .map(|(address, value)| (address, value.to_string()))
            .collect();
        for item in &changes.to_remove {
            state.remove(&item.address);
        }
        for item in changes.to_add.iter().chain(&changes.to_update) {
            state.insert(item.address.clone(), item.value.clone());
        }

        prop_assert_eq!(Snapshot::from_items(state), source);
    }

    #[test]
    fn scalar_values_survive_the_wire(value in scalar_json_strategy()) {
        let typed = TypedValue::from_json(value.clone()).unwrap();
        let decoded = TypedValue::from_wire(typed.kind(), &typed.to_wire()).unwrap();

        prop_assert_eq!(decoded.kind(), typed.kind());
        prop_assert_eq!(decoded.to_json(), value);
    }

    #[test]
    fn number_wire_form_rejects_text(text in "[a-z]{1,8}") {
        // "inf" and "nan" parse as floats but are not finite
        prop_assert!(TypedValue::from_wire(Kind::Number, &text).is_err());
    }
}
