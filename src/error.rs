//! Error types for taskapp
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown user or task, missing data dir)
//! - 3: Rejected (authentication failure, invalid status transition, duplicate code)
//! - 4: Operation failed (I/O, malformed CSV row, lock contention)

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Status;

/// Exit codes for the taskapp CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskapp operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("User not found: {0}")]
    UserNotFound(u32),

    #[error("Task not found: {0}")]
    TaskNotFound(u32),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing credentials: pass --email and --password (or TASKAPP_EMAIL / TASKAPP_PASSWORD)")]
    MissingCredentials,

    #[error("Data directory not initialized: {0}")]
    DataDirNotInitialized(PathBuf),

    // Rejections (exit code 3)
    #[error("Authentication failed: email and password do not match any user")]
    AuthenticationFailed,

    #[error("Invalid status transition for task {code}: {from} -> {to} (status only advances one step)")]
    InvalidTransition { code: u32, from: Status, to: Status },

    #[error("Task code already exists: {0}")]
    DuplicateTaskCode(u32),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Malformed row in {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::UserNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::MissingCredentials
            | Error::DataDirNotInitialized(_) => exit_codes::USER_ERROR,

            // Rejections
            Error::AuthenticationFailed
            | Error::InvalidTransition { .. }
            | Error::DuplicateTaskCode(_) => exit_codes::REJECTED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::Parse { .. }
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Machine-readable category matching the exit code
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::REJECTED => "rejected",
            _ => "operation_failed",
        }
    }

    /// Structured details for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        use serde_json::json;

        match self {
            Error::UserNotFound(code) => Some(json!({ "user_code": code })),
            Error::TaskNotFound(code) | Error::DuplicateTaskCode(code) => {
                Some(json!({ "task_code": code }))
            }
            Error::InvalidTransition { code, from, to } => Some(json!({
                "task_code": code,
                "from": from.code(),
                "to": to.code(),
                "expected": from.next().map(Status::code),
            })),
            Error::InvalidArgument(message)
            | Error::InvalidConfig(message)
            | Error::OperationFailed(message) => Some(json!({ "message": message })),
            Error::DataDirNotInitialized(path) | Error::LockFailed(path) => {
                Some(json!({ "path": path.display().to_string() }))
            }
            Error::Parse {
                path,
                line,
                message,
            } => Some(json!({
                "path": path.display().to_string(),
                "line": line,
                "message": message,
            })),
            _ => None,
        }
    }
}

/// Result type alias for taskapp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
