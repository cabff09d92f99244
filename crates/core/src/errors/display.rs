//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::CommandExecution {
                command,
                args,
                message,
            } => {
                let args_str = args.join(" ");
                let full = if args_str.is_empty() {
                    command.clone()
                } else {
                    format!("{command} {args_str}")
                };
                write!(f, "command '{full}' failed: {message}")
            }
            Error::Io { operation, source } => {
                write!(f, "I/O error while {operation}: {source}")
            }
        }
    }
}
