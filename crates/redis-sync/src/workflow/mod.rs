//! Commands of the tool, as library functions.

mod commit;
mod init;
mod pull;
mod push;

pub use commit::{commit, diff, status};
pub use init::{init, InitReport, INIT_COMMIT_MESSAGE};
pub use pull::pull;
pub use push::push;
