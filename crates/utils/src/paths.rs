//! Path utilities for clicache-specific file locations

use clicache_core::CACHE_DIR_NAME;
use std::path::PathBuf;

/// Default cache directory: `$HOME/.cache/clicache`.
///
/// Falls back to the relative `.cache/clicache` when no home directory
/// can be determined.
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".cache"))
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CACHE_DIR_NAME)
}
