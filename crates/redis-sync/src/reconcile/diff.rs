use crate::address::Address;
use crate::snapshot::Snapshot;

/// One address of a change set and the value it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    pub address: Address,
    pub value: String,
}

impl ChangeItem {
    pub fn new(address: Address, value: impl Into<String>) -> Self {
        Self {
            address,
            value: value.into(),
        }
    }
}

/// Delta that turns a target snapshot into a source snapshot.
///
/// Adds and updates carry the source value, removes carry the target value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub to_add: Vec<ChangeItem>,
    pub to_remove: Vec<ChangeItem>,
    pub to_update: Vec<ChangeItem>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.to_update.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len() + self.to_update.len()
    }
}

/// Compares every address of both snapshots, field by field.
///
/// Values are equal when their wire forms are byte-identical.
pub fn diff(source: &Snapshot, target: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (address, value) in source.iter() {
        match target.get(&address) {
            None => changes.to_add.push(ChangeItem::new(address, value)),
            Some(existing) if existing != value => {
                changes.to_update.push(ChangeItem::new(address, value))
            }
            Some(_) => {}
        }
    }

    for (address, value) in target.iter() {
        if !source.contains(&address) {
            changes.to_remove.push(ChangeItem::new(address, value));
        }
    }

    changes
}
