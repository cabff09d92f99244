//! Error types for clicache operations

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
