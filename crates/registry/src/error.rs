use thiserror::Error;

/// Why a manager refused an entity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("name rejected by the namespace filter")]
    InvalidName,

    #[error("name already registered in the namespace")]
    DuplicateName,
}

/// Definition-compiler failure with a human-readable message.
///
/// The manager and graph layers have no textual errors of their own; this
/// is the one place a message string originates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
