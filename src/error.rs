use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for gitflow operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// Wrong branch, dirty working tree or wrong branch-name prefix
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Invalid version string, bump kind or commit field
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Non-zero exit from an external tool; carries its captured stderr
    #[error("`{command}` failed: {stderr}")]
    ExternalTool { command: String, stderr: String },

    /// Non-success response from the review service; carries the response body
    #[error("Review request failed ({status}): {body}")]
    RemoteService { status: u16, body: String },

    /// The review service could not be reached at all
    #[error("Could not reach review service: {0}")]
    Network(String),

    #[error("Could not read manifest {}: {reason}", .path.display())]
    ManifestRead { path: PathBuf, reason: String },

    #[error("Could not write manifest {}: {reason}", .path.display())]
    ManifestWrite { path: PathBuf, reason: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitflow
pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        FlowError::Precondition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FlowError::Validation(msg.into())
    }

    pub fn external(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        FlowError::ExternalTool {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        FlowError::RemoteService {
            status,
            body: body.into(),
        }
    }

    pub fn manifest_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FlowError::ManifestRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn manifest_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FlowError::ManifestWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        FlowError::Prompt(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        FlowError::Config(msg.into())
    }

    /// True for precondition and input errors, which are raised before any
    /// mutation is attempted
    pub fn is_pre_mutation(&self) -> bool {
        matches!(self, FlowError::Precondition(_) | FlowError::Validation(_))
    }
}
