//! Application layer errors

use thiserror::Error;

/// General assistant errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Api(#[from] ApiError),

    #[error("Live update error: {0}")]
    Realtime(#[from] RealtimeError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Naira server request errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("Not signed in (request to {0} was refused)")]
    Unauthorized(String),
}

/// Study session tracking errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A study session is already active: {0}")]
    AlreadyActive(String),

    #[error("No study session is active")]
    NotActive,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Live update socket errors
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Bad event payload: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ApiError::Http { status: 404, url: "http://h/api/tasks/9".to_string() };
        assert_eq!(err.to_string(), "HTTP 404 from http://h/api/tasks/9");

        let err: AppError = CommandError::NotFound("nope".to_string()).into();
        assert_eq!(err.to_string(), "Command error: Command not found: nope");
    }
}
