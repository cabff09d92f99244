//! Running the wrapped command
//!
//! The command inherits the wrapper's standard input and standard error.
//! Its standard output is piped back and duplicated by a [`TeeWriter`]
//! into the live stream and the cache file being written.

pub mod command_executor;
pub mod tee;

pub use command_executor::{CommandExecutor, ExitOutcome, SystemCommandExecutor};
pub use tee::TeeWriter;
