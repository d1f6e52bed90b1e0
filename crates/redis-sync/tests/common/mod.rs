//! Shared test utilities for redis-sync integration tests.
//!
//! This module provides:
//! - `TestWorkspace` for isolated workspaces in temp directories
//! - `RecordingVersioning`, a versioning fake that records its calls
//! - Builders for bindings and pre-filled remote stores

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{RecordingVersioning, TestWorkspace, TEST_TOKEN};
