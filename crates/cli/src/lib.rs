//! clicache: cache the standard output of a command for a time window
//!
//! `args` turns the process arguments into a [`args::Cli`], which yields
//! the immutable [`clicache_core::Settings`]. `execute` runs the cache
//! state machine and returns an [`execute::Outcome`]; the binary performs
//! the single process exit.

pub mod args;
pub mod execute;

pub use args::{Cli, Invocation};
pub use execute::Outcome;
