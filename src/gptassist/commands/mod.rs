use crate::collect::Collection;
use crate::model::ProjectState;

pub mod persist;
pub mod print;
pub mod prompt;
pub mod status;
pub mod watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Text meant for stdout as-is: a prompt, a tree, a listing.
    pub output: Option<String>,
    /// Snapshot of the session state, for status display.
    pub state: Option<ProjectState>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_state(mut self, state: ProjectState) -> Self {
        self.state = Some(state);
        self
    }

    /// Surfaces collection problems (unreadable files, missing dirs) as warnings.
    pub fn with_problems(mut self, collection: &Collection) -> Self {
        self.messages.extend(
            collection
                .problems
                .iter()
                .map(|p| CmdMessage::warning(p.clone())),
        );
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
