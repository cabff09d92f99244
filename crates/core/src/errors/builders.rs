//! Builder methods for creating errors with context

use super::types::Error;
use crate::constants::INTERNAL_ERROR_EXIT_CODE;
use std::path::PathBuf;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
        }
    }

    /// Create a standard stream I/O error
    #[must_use]
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Exit status the wrapper terminates with when this error reaches the top
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        INTERNAL_ERROR_EXIT_CODE
    }
}
