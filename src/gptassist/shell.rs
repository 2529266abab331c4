//! Pass-through execution for input that is not an assistant command.
//!
//! The child runs to completion before control returns; output is captured
//! in full, never streamed.

use crate::error::{AssistError, Result};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Stdout when the command succeeded, stderr otherwise.
    pub output: String,
    pub success: bool,
}

pub trait ShellRunner {
    fn run(&self, line: &str) -> Result<ShellOutput>;
}

/// Runs commands on the host. On Unix the line is split with shell quoting
/// rules and executed directly; on Windows it goes through `cmd /C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostShell;

impl HostShell {
    fn command_for(line: &str) -> Result<Command> {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", line]);
            return Ok(cmd);
        }

        let words = shell_words::split(line).map_err(|e| AssistError::Shell(e.to_string()))?;
        let (program, args) = words
            .split_first()
            .ok_or_else(|| AssistError::Shell("Empty command".to_string()))?;
        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd)
    }
}

impl ShellRunner for HostShell {
    fn run(&self, line: &str) -> Result<ShellOutput> {
        debug!("passing through to shell: {}", line);
        let output = Self::command_for(line)?
            .output()
            .map_err(|e| AssistError::Shell(format!("Error running command: {}", e)))?;

        let success = output.status.success();
        let bytes = if success { output.stdout } else { output.stderr };
        Ok(ShellOutput {
            output: String::from_utf8_lossy(&bytes).into_owned(),
            success,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_on_success() {
        let out = HostShell.run("echo 'hello world'").unwrap();
        assert!(out.success);
        assert_eq!(out.output, "hello world\n");
    }

    #[test]
    fn captures_stderr_on_failure() {
        let out = HostShell.run("ls /definitely/not/here").unwrap();
        assert!(!out.success);
        assert!(!out.output.is_empty());
    }

    #[test]
    fn unknown_program_is_an_error() {
        assert!(HostShell.run("gpta-definitely-not-installed").is_err());
    }

    #[test]
    fn empty_line_is_an_error() {
        assert!(HostShell.run("   ").is_err());
    }
}
