use super::{decode, encode, StateBackend};
use crate::error::{AssistError, Result};
use crate::model::ProjectState;
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy)]
pub struct FileBackend;

impl FileBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StateBackend for FileBackend {
    fn save(&self, path: &Path, state: &ProjectState) -> Result<()> {
        let content = encode(state)?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(AssistError::Io)?;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AssistError::Store(format!("Not a file path: {}", path.display())))?;

        // Atomic write
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(AssistError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(AssistError::Io(e));
        }

        debug!("saved state to {}", path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ProjectState> {
        let content = fs::read_to_string(path).map_err(AssistError::Io)?;
        let state = decode(&content)?;
        debug!("loaded state from {}", path.display());
        Ok(state)
    }
}
