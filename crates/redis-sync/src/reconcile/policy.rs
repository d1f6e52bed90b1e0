use crate::address::Address;
use crate::error::{Result, SyncError};
use crate::reconcile::prompt::{Answer, DecisionProvider};

/// What the target holds at an address right before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Situation {
    /// Nothing stored there.
    Absent,
    /// The target key has another shape than the write needs.
    ShapeMismatch,
    Identical,
    Differs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Write,
    /// Drop the whole target key first.
    DeleteThenWrite,
    /// Already up to date.
    Ignore,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Act(Action),
    /// Ask the operator; "yes" runs the action, anything else skips.
    Ask(Action),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictPolicy {
    pub overwrite: bool,
    pub continue_on_error: bool,
}

impl ConflictPolicy {
    pub fn new(overwrite: bool, continue_on_error: bool) -> Self {
        Self {
            overwrite,
            continue_on_error,
        }
    }

    pub fn decide(&self, situation: Situation) -> Decision {
        match situation {
            Situation::Absent => Decision::Act(Action::Write),
            Situation::Identical => Decision::Act(Action::Ignore),
            Situation::ShapeMismatch if self.overwrite => Decision::Act(Action::DeleteThenWrite),
            Situation::ShapeMismatch => Decision::Ask(Action::DeleteThenWrite),
            Situation::Differs if self.overwrite => Decision::Act(Action::Write),
            Situation::Differs => Decision::Ask(Action::Write),
        }
    }

    /// Settles `situation`, asking `decisions` when the flags do not.
    pub fn resolve(
        &self,
        address: &Address,
        situation: Situation,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<Action> {
        match self.decide(situation) {
            Decision::Act(action) => Ok(action),
            Decision::Ask(action) => {
                let question = match situation {
                    Situation::ShapeMismatch => format!(
                        "{} has a different type in the target. Delete it and write?",
                        address
                    ),
                    _ => format!("{} has a different value in the target. Overwrite?", address),
                };
                match decisions.confirm(&question)? {
                    Answer::Yes => Ok(action),
                    Answer::No => {
                        log::info!("Skipped {}", address);
                        Ok(Action::Skip)
                    }
                }
            }
        }
    }

    /// Lets a per-item backend failure pass when `continue_on_error` is
    /// set. Everything else is returned as is.
    pub fn tolerate(&self, address: &Address, err: SyncError) -> Result<()> {
        if self.continue_on_error && err.is_item_recoverable() {
            log::warn!("Skipping {}: {}", address, err);
            Ok(())
        } else {
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::reconcile::prompt::ScriptedDecisions;

    #[test]
    fn test_decision_table() {
        let cases = [
            (Situation::Absent, false, Decision::Act(Action::Write)),
            (Situation::Absent, true, Decision::Act(Action::Write)),
            (Situation::ShapeMismatch, false, Decision::Ask(Action::DeleteThenWrite)),
            (Situation::ShapeMismatch, true, Decision::Act(Action::DeleteThenWrite)),
            (Situation::Identical, false, Decision::Act(Action::Ignore)),
            (Situation::Identical, true, Decision::Act(Action::Ignore)),
            (Situation::Differs, false, Decision::Ask(Action::Write)),
            (Situation::Differs, true, Decision::Act(Action::Write)),
        ];

        for (situation, overwrite, expected) in cases {
            let policy = ConflictPolicy::new(overwrite, false);
            assert_eq!(
                policy.decide(situation),
                expected,
                "situation {:?}, overwrite {}",
                situation,
                overwrite
            );
        }
    }

    #[test]
    fn test_resolve_asks_only_when_needed() {
        let policy = ConflictPolicy::default();
        let address = Address::plain("a");
        let mut script = ScriptedDecisions::from_lines(["y", "n", "?"]);

        assert_eq!(
            policy.resolve(&address, Situation::Differs, &mut script).unwrap(),
            Action::Write
        );
        assert_eq!(
            policy.resolve(&address, Situation::Differs, &mut script).unwrap(),
            Action::Skip
        );
        assert_eq!(
            policy.resolve(&address, Situation::ShapeMismatch, &mut script).unwrap(),
            Action::Skip
        );
        assert_eq!(
            policy.resolve(&address, Situation::Absent, &mut script).unwrap(),
            Action::Write
        );
        assert_eq!(script.questions().len(), 3);
    }

    #[test]
    fn test_prompt_failure_aborts_even_with_continue() {
        let policy = ConflictPolicy::new(false, true);
        let mut script = ScriptedDecisions::none();
        let err = policy
            .resolve(&Address::plain("a"), Situation::Differs, &mut script)
            .unwrap_err();
        assert!(matches!(err, SyncError::UserInput(_)));
    }

    #[test]
    fn test_tolerate() {
        let address = Address::plain("a");
        let remote_error = || SyncError::from(RemoteError::command("GET", "a", "boom"));

        assert!(ConflictPolicy::new(false, true)
            .tolerate(&address, remote_error())
            .is_ok());
        assert!(ConflictPolicy::new(false, false)
            .tolerate(&address, remote_error())
            .is_err());
        assert!(ConflictPolicy::new(false, true)
            .tolerate(&address, SyncError::TokenMismatch)
            .is_err());
    }
}
