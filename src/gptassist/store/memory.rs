use super::{decode, encode, StateBackend};
use crate::error::{AssistError, Result};
use crate::model::ProjectState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory backend for testing.
///
/// Uses `RefCell` for interior mutability since the session is
/// single-threaded and the trait takes `&self`.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Raw stored text, for asserting on the serialized form.
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn put_raw(&self, path: &Path, text: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), text.to_string());
    }
}

impl StateBackend for MemBackend {
    fn save(&self, path: &Path, state: &ProjectState) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(AssistError::Store("Simulated write error".to_string()));
        }
        let text = encode(state)?;
        self.files.borrow_mut().insert(path.to_path_buf(), text);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ProjectState> {
        let files = self.files.borrow();
        let text = files
            .get(path)
            .ok_or_else(|| AssistError::Store(format!("No saved state at {}", path.display())))?;
        decode(text)
    }
}
