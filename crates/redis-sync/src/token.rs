//! Pairing between one local workspace and one remote store.

use std::fmt;

use crate::error::{Result, SyncError};
use crate::remote::RemoteStore;

/// Reserved remote key holding the token of the paired workspace.
pub const SYNC_TOKEN_KEY: &str = "__redis_sync_token";

/// Opaque pairing credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncToken(String);

impl SyncToken {
    /// Wraps an existing token, trimming surrounding whitespace. Returns
    /// `None` when nothing is left.
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// Generates a fresh token: a v4 UUID without dashes.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful pairing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// The remote store had no token; the local one was written.
    FirstPairing,
    /// The remote token equals the local one.
    Matched,
}

/// Verifies that `remote` belongs to the workspace owning `local`.
///
/// Must run before any other remote read or write of a push or pull. On a
/// mismatch nothing beyond the token key is touched.
pub fn ensure_paired(remote: &mut dyn RemoteStore, local: &SyncToken) -> Result<Pairing> {
    if !remote.exists(SYNC_TOKEN_KEY)? {
        remote.set(SYNC_TOKEN_KEY, local.as_str())?;
        log::info!("Paired remote store with workspace token {}", local);
        return Ok(Pairing::FirstPairing);
    }

    let remote_token = remote.get(SYNC_TOKEN_KEY)?.unwrap_or_default();
    if remote_token.trim() == local.as_str() {
        log::debug!("Sync token matched");
        Ok(Pairing::Matched)
    } else {
        log::warn!("Sync token mismatch, refusing to touch the remote store");
        Err(SyncError::TokenMismatch)
    }
}
