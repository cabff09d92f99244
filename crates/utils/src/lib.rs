//! Shared utilities for clicache
//!
//! Logging setup, cache directory resolution and the atomic
//! rename-into-place used when committing cache entries.

pub mod atomic_file;
pub mod paths;
pub mod tracing;

pub use atomic_file::*;
pub use paths::*;
