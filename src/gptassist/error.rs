use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Shell error: {0}")]
    Shell(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, AssistError>;
