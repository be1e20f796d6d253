//! CLI-specific error types
//!
//! All CLI errors are fatal: the binary prints them and exits non-zero.

use std::fmt;
use std::io;

use crate::errors::DataManagerError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Invalid tab definition
    InvalidTab,
    /// Query or server failure
    Failed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DM_CLI_CONFIG_ERROR",
            Self::IoError => "DM_CLI_IO_ERROR",
            Self::InvalidTab => "DM_CLI_INVALID_TAB",
            Self::Failed => "DM_CLI_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_tab(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidTab, msg)
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::Failed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DataManagerError> for CliError {
    fn from(e: DataManagerError) -> Self {
        let code = match &e {
            DataManagerError::Config(_) => CliErrorCode::ConfigError,
            DataManagerError::Storage(_) => CliErrorCode::IoError,
            _ => CliErrorCode::Failed,
        };
        Self::new(code, format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_manager_error_mapping() {
        let err = CliError::from(DataManagerError::Config("bad port".into()));
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let err = CliError::from(DataManagerError::UnknownOperator("near".into()));
        assert_eq!(err.code_str(), "DM_CLI_FAILED");
        assert!(err.message().starts_with("DM_UNKNOWN_OPERATOR"));
    }
}
