use crate::error::{AssistError, Result};
use std::cell::RefCell;
use std::io::Write;
use std::process::{Command, Stdio};

/// Somewhere a finished prompt can be handed off to.
pub trait ClipboardSink {
    fn copy(&self, text: &str) -> Result<()>;
}

/// The OS clipboard, reached through the platform's copy utility.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        copy_to_clipboard(text)
    }
}

/// Keeps every copied string; for tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemClipboard {
    copied: RefCell<Vec<String>>,
}

impl MemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.copied.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.copied.borrow().len()
    }
}

impl ClipboardSink for MemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Copies text to the system clipboard in an OS-specific way.
/// - macOS: uses pbcopy
/// - Linux: uses wl-copy, xclip or xsel
/// - Windows: uses clip.exe
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        pipe_into("pbcopy", &[], text)
    }

    #[cfg(target_os = "linux")]
    {
        copy_linux(text)
    }

    #[cfg(target_os = "windows")]
    {
        pipe_into("clip", &[], text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = text;
        Err(AssistError::Clipboard(
            "Clipboard not supported on this platform".to_string(),
        ))
    }
}

#[cfg(target_os = "linux")]
fn copy_linux(text: &str) -> Result<()> {
    const CANDIDATES: [(&str, &[&str]); 3] = [
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
    ];

    let mut last_err = None;
    for (program, args) in CANDIDATES {
        match pipe_into(program, args, text) {
            Ok(()) => return Ok(()),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        AssistError::Clipboard("No clipboard utility found. Install xclip or xsel.".to_string())
    }))
}

#[allow(dead_code)]
fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AssistError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| AssistError::Clipboard(format!("Failed to write to {}: {}", program, e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| AssistError::Clipboard(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(AssistError::Clipboard(format!("{} exited with error", program)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_clipboard_keeps_history() {
        let clip = MemClipboard::new();
        clip.copy("one").unwrap();
        clip.copy("two").unwrap();
        assert_eq!(clip.count(), 2);
        assert_eq!(clip.last().as_deref(), Some("two"));
    }

    #[test]
    fn missing_program_is_an_error_not_a_panic() {
        let err = pipe_into("gpta-definitely-not-installed", &[], "x").unwrap_err();
        assert!(matches!(err, AssistError::Clipboard(_)));
    }
}
