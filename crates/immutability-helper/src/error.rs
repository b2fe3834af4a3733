use thiserror::Error;

/// Result alias used throughout the crate.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Errors raised while resolving a spec against a value.
///
/// Every check runs before the mutation it guards, and nothing is caught
/// internally: the first failure aborts the whole `update` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpdateError {
    /// The spec (or a nested path spec) has the wrong shape.
    #[error("update(): You provided an invalid spec to update(). {0}")]
    InvalidSpec(String),

    /// A command payload does not match the command's contract.
    #[error("update(): expected spec of {command} to be {expected}; got {got}.")]
    InvalidCommandPayload {
        command: String,
        expected: &'static str,
        got: String,
    },

    /// A command (or a path key) was applied to a value of the wrong kind.
    #[error("update(): {command} expects a target of type {expected}; got {got}.")]
    InvalidTargetType {
        command: String,
        expected: &'static str,
        got: &'static str,
    },

    /// `$set` shares its spec object with other keys.
    #[error("Cannot have more than one key in an object with $set")]
    AmbiguousSet,

    /// Failure reported by a registered custom command.
    #[error("update(): {command} failed: {message}")]
    Command { command: String, message: String },
}

impl UpdateError {
    pub(crate) fn payload(command: &str, expected: &'static str, got: impl ToString) -> Self {
        UpdateError::InvalidCommandPayload {
            command: command.to_string(),
            expected,
            got: got.to_string(),
        }
    }

    pub(crate) fn target(command: &str, expected: &'static str, got: &'static str) -> Self {
        UpdateError::InvalidTargetType {
            command: command.to_string(),
            expected,
            got,
        }
    }

    /// Builds the error a custom command returns when it rejects its input.
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        UpdateError::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}
