use std::collections::BTreeMap;

use tracing::info_span;

use crate::address::Address;
use crate::error::{Result, SyncError};
use crate::reconcile::diff::{ChangeItem, ChangeSet};
use crate::reconcile::policy::{Action, ConflictPolicy, Situation};
use crate::reconcile::prompt::DecisionProvider;
use crate::reconcile::report::ApplyReport;
use crate::remote::{RemoteKind, RemoteStore};
use crate::snapshot::Snapshot;
use crate::storage::LocalStore;
use crate::value::TypedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeKind {
    Add,
    Update,
}

/// Applies change sets one item at a time, re-reading the live target
/// state right before each write.
pub struct Reconciler<'a> {
    policy: ConflictPolicy,
    decisions: &'a mut dyn DecisionProvider,
    prune: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(policy: ConflictPolicy, decisions: &'a mut dyn DecisionProvider) -> Self {
        Self {
            policy,
            decisions,
            prune: false,
        }
    }

    /// Also delete remote addresses that are absent locally on push.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Writes `changes` to `remote`. `source` is the local snapshot the
    /// change set was computed from.
    pub fn apply_push(
        &mut self,
        changes: &ChangeSet,
        source: &Snapshot,
        remote: &mut dyn RemoteStore,
    ) -> Result<ApplyReport> {
        let _span = info_span!("push", changes = changes.len(), prune = self.prune).entered();

        let mut report = ApplyReport {
            total: source.len(),
            ignored: source
                .len()
                .saturating_sub(changes.to_add.len() + changes.to_update.len()),
            ..ApplyReport::default()
        };

        for item in &changes.to_add {
            self.push_item(item, ChangeKind::Add, remote, &mut report)?;
        }

        for item in &changes.to_remove {
            if !self.prune {
                log::info!("{} exists only in the remote store, keeping it", item.address);
                continue;
            }
            match delete_remote(remote, &item.address) {
                Ok(()) => {
                    log::debug!("Deleted {}", item.address);
                    report.removed += 1;
                }
                Err(e) => {
                    self.policy.tolerate(&item.address, e)?;
                    report.skipped += 1;
                }
            }
        }

        for item in &changes.to_update {
            self.push_item(item, ChangeKind::Update, remote, &mut report)?;
        }

        log::info!("Push finished: {}", report);
        Ok(report)
    }

    fn push_item(
        &mut self,
        item: &ChangeItem,
        change: ChangeKind,
        remote: &mut dyn RemoteStore,
        report: &mut ApplyReport,
    ) -> Result<()> {
        let address = &item.address;

        let situation = match observe_remote(remote, address, &item.value) {
            Ok(situation) => situation,
            Err(e) => {
                self.policy.tolerate(address, e)?;
                report.skipped += 1;
                return Ok(());
            }
        };

        let action = self.policy.resolve(address, situation, self.decisions)?;
        let written = match action {
            Action::Write => write_remote(remote, address, &item.value),
            Action::DeleteThenWrite => remote
                .delete(address.key())
                .map_err(SyncError::from)
                .and_then(|_| write_remote(remote, address, &item.value)),
            Action::Ignore => {
                report.ignored += 1;
                return Ok(());
            }
            Action::Skip => {
                report.skipped += 1;
                return Ok(());
            }
        };

        match written {
            Ok(()) => {
                log::debug!("Pushed {}", address);
                match change {
                    ChangeKind::Add => report.added += 1,
                    ChangeKind::Update => report.updated += 1,
                }
            }
            Err(e) => {
                self.policy.tolerate(address, e)?;
                report.skipped += 1;
            }
        }
        Ok(())
    }

    /// Writes `changes` into `local`. `source` is the remote snapshot the
    /// change set was computed from; it tells whole removed containers
    /// apart from single removed fields.
    pub fn apply_pull(
        &mut self,
        changes: &ChangeSet,
        source: &Snapshot,
        local: &LocalStore<'_>,
    ) -> Result<ApplyReport> {
        let _span = info_span!("pull", changes = changes.len()).entered();

        let mut report = ApplyReport {
            total: changes.len(),
            ..ApplyReport::default()
        };

        for item in &changes.to_add {
            self.pull_item(item, ChangeKind::Add, local, &mut report)?;
        }

        let mut removed_fields: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for item in &changes.to_remove {
            match item.address.field() {
                None => match local.remove(&item.address) {
                    Ok(()) => report.removed += 1,
                    Err(e) => {
                        self.policy.tolerate(&item.address, e.into())?;
                        report.skipped += 1;
                    }
                },
                Some(field) => {
                    removed_fields
                        .entry(item.address.key())
                        .or_default()
                        .push(field);
                }
            }
        }
        for (key, fields) in removed_fields {
            let address = Address::hash_field(key, fields[0]);
            let removed = if source.has_fields(key) {
                local.remove_fields(key, &fields)
            } else {
                local.remove(&address)
            };
            match removed {
                Ok(()) => {
                    log::debug!("Removed {} field(s) of '{}'", fields.len(), key);
                    report.removed += fields.len();
                }
                Err(e) => {
                    self.policy.tolerate(&address, e.into())?;
                    report.skipped += fields.len();
                }
            }
        }

        for item in &changes.to_update {
            self.pull_item(item, ChangeKind::Update, local, &mut report)?;
        }

        log::info!("Pull finished: {}", report);
        Ok(report)
    }

    fn pull_item(
        &mut self,
        item: &ChangeItem,
        change: ChangeKind,
        local: &LocalStore<'_>,
        report: &mut ApplyReport,
    ) -> Result<()> {
        let address = &item.address;
        let (kind, _) = local.registry().resolve_address(address);
        let incoming =
            TypedValue::from_wire(kind, &item.value).map_err(|reason| SyncError::InvalidValue {
                address: address.clone(),
                kind,
                reason,
            })?;

        let existing = match local.load_value(address) {
            Ok(existing) => existing,
            Err(e) => {
                self.policy.tolerate(address, e.into())?;
                report.skipped += 1;
                return Ok(());
            }
        };

        let situation = match existing {
            None => Situation::Absent,
            Some(current) if current.kind() != incoming.kind() => {
                return Err(SyncError::TypeMismatch {
                    address: address.clone(),
                    expected: current.kind(),
                    actual: incoming.kind(),
                });
            }
            Some(current) if current == incoming => Situation::Identical,
            Some(_) => Situation::Differs,
        };

        match self.policy.resolve(address, situation, self.decisions)? {
            Action::Write | Action::DeleteThenWrite => match local.store(address, incoming) {
                Ok(()) => {
                    log::debug!("Pulled {}", address);
                    match change {
                        ChangeKind::Add => report.added += 1,
                        ChangeKind::Update => report.updated += 1,
                    }
                }
                Err(e) => {
                    self.policy.tolerate(address, e)?;
                    report.skipped += 1;
                }
            },
            Action::Ignore => report.ignored += 1,
            Action::Skip => report.skipped += 1,
        }
        Ok(())
    }
}

/// Compares the live remote state at `address` with the value to write.
fn observe_remote(
    remote: &mut dyn RemoteStore,
    address: &Address,
    value: &str,
) -> Result<Situation> {
    let kind = remote.kind_of(address.key())?;
    if kind == RemoteKind::None {
        return Ok(Situation::Absent);
    }
    if !kind.matches(address.shape()) {
        log::debug!("{} is a remote {}, expected {}", address, kind, address.shape());
        return Ok(Situation::ShapeMismatch);
    }

    let live = match address.field() {
        None => remote.get(address.key())?,
        Some(field) => remote.hash_get(address.key(), field)?,
    };

    Ok(match live {
        None => Situation::Absent,
        Some(live) if live == value => Situation::Identical,
        Some(_) => Situation::Differs,
    })
}

fn write_remote(remote: &mut dyn RemoteStore, address: &Address, value: &str) -> Result<()> {
    match address.field() {
        None => remote.set(address.key(), value)?,
        Some(field) => remote.hash_set(address.key(), field, value)?,
    }
    Ok(())
}

fn delete_remote(remote: &mut dyn RemoteStore, address: &Address) -> Result<()> {
    match address.field() {
        None => remote.delete(address.key())?,
        Some(field) => remote.hash_delete(address.key(), field)?,
    }
    Ok(())
}
