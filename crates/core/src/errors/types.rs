//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for clicache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for clicache operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid flags or flag values
    Configuration { message: String },

    /// File system operations on the cache directory and its entries
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped command could not be located or started
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
    },

    /// I/O on the standard streams
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}
