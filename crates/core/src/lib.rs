//! Core domain types, settings, and errors for `clicache`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every
//!   crate in the workspace. All variants map to exit status 1.
//! - **`types`**: the `CommandLine` newtype for the wrapped argument
//!   vector, the `BucketWidth` duration value and the immutable
//!   `Settings` built once from the command line.
//! - **`constants`**: file suffixes, defaults and the internal exit status.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
