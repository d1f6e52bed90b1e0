//! Delta computation between two snapshots and its application.

mod diff;
mod engine;
mod policy;
mod prompt;
mod report;

pub use diff::{diff, ChangeItem, ChangeSet};
pub use engine::Reconciler;
pub use policy::{Action, ConflictPolicy, Decision, Situation};
pub use prompt::{parse_answer, Answer, DecisionProvider, InteractivePrompt, ScriptedDecisions};
pub use report::ApplyReport;
