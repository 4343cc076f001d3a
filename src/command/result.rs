//! Uniform result of a session operation

use skyhop_shared::Response;
use std::fmt;

/// Outcome of one session operation
///
/// Session operations never return `Err`; every fault is folded into
/// `Failure` with a message the caller can show as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Operation completed
    Success { message: String },
    /// Operation refused or failed
    Failure { reason: String },
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        CommandResult::Success {
            message: message.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        CommandResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success { .. })
    }

    /// The success message or failure reason
    pub fn text(&self) -> &str {
        match self {
            CommandResult::Success { message } => message,
            CommandResult::Failure { reason } => reason,
        }
    }

    /// Convert into the wire response for `request_id`
    pub fn into_response(self, request_id: u64) -> Response {
        match self {
            CommandResult::Success { message } => Response::success(request_id, message),
            CommandResult::Failure { reason } => Response::failure(request_id, reason),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
