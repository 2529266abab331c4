//! # Storage Layer
//!
//! Session state lives in memory for the whole run; nothing is persisted
//! unless the user asks for it with `save`, and `load` replaces the in-memory
//! state wholesale. The [`StateBackend`] trait is the seam between those
//! commands and wherever the bytes actually go.
//!
//! ## Implementations
//!
//! - [`fs::FileBackend`]: JSON files on disk, written atomically (temp file in
//!   the target directory, then rename) so an interrupted save never leaves a
//!   half-written file behind.
//! - [`memory::MemBackend`]: keeps serialized state in a map, for tests.
//!
//! Both go through the same serde representation of
//! [`ProjectState`](crate::model::ProjectState), so a memory round-trip
//! exercises the exact format a file would contain.

use crate::error::Result;
use crate::model::ProjectState;
use std::path::Path;

pub mod fs;
pub mod memory;

pub trait StateBackend {
    /// Persist `state` at `path`, replacing whatever was there.
    fn save(&self, path: &Path, state: &ProjectState) -> Result<()>;

    /// Read a previously saved state from `path`.
    fn load(&self, path: &Path) -> Result<ProjectState>;
}

pub(crate) fn encode(state: &ProjectState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub(crate) fn decode(text: &str) -> Result<ProjectState> {
    Ok(serde_json::from_str(text)?)
}
