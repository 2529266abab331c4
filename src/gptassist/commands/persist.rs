use crate::commands::{CmdMessage, CmdResult};
use crate::model::ProjectState;
use crate::store::StateBackend;
use std::path::Path;

pub fn save<B: StateBackend>(backend: &B, state: &ProjectState, path: &Path) -> CmdResult {
    let message = match backend.save(path, state) {
        Ok(()) => CmdMessage::success(format!("Context successfully saved to {}.", path.display())),
        Err(e) => CmdMessage::error(format!("Error saving context: {}", e)),
    };
    CmdResult::default().with_message(message)
}

/// Replaces `state` with what is stored at `path`. On failure `state` is
/// left exactly as it was.
pub fn load<B: StateBackend>(backend: &B, state: &mut ProjectState, path: &Path) -> CmdResult {
    let message = match backend.load(path) {
        Ok(loaded) => {
            state.restore(loaded);
            CmdMessage::success(format!("Context successfully loaded from {}.", path.display()))
        }
        Err(e) => CmdMessage::error(format!("Error loading context: {}", e)),
    };
    CmdResult::default().with_message(message)
}
