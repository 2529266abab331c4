//! Edits to the watch configuration: directories, ignore patterns, URLs,
//! extensions and the project name.
//!
//! Adding something already present or removing something absent is not an
//! error; it leaves the state alone and reports a warning.

use crate::collect::validate_pattern;
use crate::commands::{CmdMessage, CmdResult};
use crate::model::{normalize_extension, ProjectState};

fn outcome(changed: bool, done: String, unchanged: String) -> CmdResult {
    let message = if changed {
        CmdMessage::success(done)
    } else {
        CmdMessage::warning(unchanged)
    };
    CmdResult::default().with_message(message)
}

fn blank(what: &str) -> CmdResult {
    CmdResult::default().with_message(CmdMessage::warning(format!("No {} entered.", what)))
}

pub fn add_dir(state: &mut ProjectState, path: &str) -> CmdResult {
    let path = path.trim();
    if path.is_empty() {
        return blank("directory");
    }
    outcome(
        state.context.add_dir(path),
        format!("Added directory '{}' to allowed list.", path),
        format!("Directory '{}' is already in the allowed list.", path),
    )
}

pub fn remove_dir(state: &mut ProjectState, path: &str) -> CmdResult {
    let path = path.trim();
    outcome(
        state.context.remove_dir(path),
        format!("Removed directory '{}' from allowed list.", path),
        format!("Directory '{}' not found in allowed list.", path),
    )
}

pub fn add_ignore(state: &mut ProjectState, pattern: &str) -> CmdResult {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return blank("pattern");
    }
    if let Err(e) = validate_pattern(pattern) {
        return CmdResult::default().with_message(CmdMessage::error(e.to_string()));
    }
    outcome(
        state.context.add_ignore(pattern),
        format!("Added '{}' to ignore list.", pattern),
        format!("'{}' is already in the ignore list.", pattern),
    )
}

pub fn remove_ignore(state: &mut ProjectState, pattern: &str) -> CmdResult {
    let pattern = pattern.trim();
    outcome(
        state.context.remove_ignore(pattern),
        format!("Removed '{}' from ignore list.", pattern),
        format!("'{}' not found in ignore list.", pattern),
    )
}

pub fn add_url(state: &mut ProjectState, url: &str) -> CmdResult {
    let url = url.trim();
    if url.is_empty() {
        return blank("URL");
    }
    outcome(
        state.context.add_url(url),
        format!("Added URL '{}'.", url),
        format!("URL '{}' is already in the list.", url),
    )
}

pub fn remove_url(state: &mut ProjectState, url: &str) -> CmdResult {
    let url = url.trim();
    outcome(
        state.context.remove_url(url),
        format!("Removed URL '{}'.", url),
        format!("URL '{}' not found in the list.", url),
    )
}

pub fn add_extension(state: &mut ProjectState, ext: &str) -> CmdResult {
    if ext.trim().is_empty() {
        return blank("extension");
    }
    let ext = normalize_extension(ext);
    outcome(
        state.context.add_extension(&ext),
        format!("Added extension '{}' to allowed list.", ext),
        format!("Extension '{}' is already in the allowed list.", ext),
    )
}

pub fn remove_extension(state: &mut ProjectState, ext: &str) -> CmdResult {
    let ext = normalize_extension(ext);
    let mut result = outcome(
        state.context.remove_extension(&ext),
        format!("Removed extension '{}' from allowed list.", ext),
        format!("Extension '{}' not found in allowed list.", ext),
    );
    if state.context.allowed_extensions.is_empty() {
        result.add_message(CmdMessage::info(
            "No extensions are allowed now; nothing will be collected.",
        ));
    }
    result
}

pub fn set_name(state: &mut ProjectState, name: &str) -> CmdResult {
    state.set_project_name(name.trim());
    CmdResult::default().with_message(CmdMessage::success(format!(
        "Project name set to '{}'.",
        state.project_name
    )))
}
