//! Domain types shared across the clicache crates

mod commands;
mod settings;

pub use commands::CommandLine;
pub use settings::{BucketWidth, Mode, Settings};
