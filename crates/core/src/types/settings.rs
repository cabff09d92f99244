//! Immutable run configuration built once at startup

use crate::constants::DEFAULT_BUCKET_WIDTH;
use crate::errors::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Width of the time buckets cache keys are rounded into.
///
/// Accepts `humantime` syntax such as `5m`, `90s`, `1h30m` or `250ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketWidth(Duration);

impl BucketWidth {
    #[must_use]
    pub fn new(width: Duration) -> Self {
        Self(width)
    }

    #[must_use]
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self(Duration::from_secs(5 * 60))
    }
}

impl FromStr for BucketWidth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        humantime::parse_duration(s.trim())
            .map(Self)
            .map_err(|e| Error::configuration(format!("invalid duration '{s}': {e}")))
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(self.0))
    }
}

/// What a single invocation should do with the matching cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Replay the entry, or run the command and record a new one
    #[default]
    Run,
    /// Remove the entry for the current bucket
    Delete,
    /// Remove every entry and stale temporary file in the cache directory
    Purge,
}

/// Configuration for one invocation, passed by reference into the core logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub bucket: BucketWidth,
    pub hash_cwd: bool,
    pub mode: Mode,
    pub verbose: bool,
}

impl Settings {
    /// Settings with defaults for everything except the cache directory
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            bucket: BucketWidth::default(),
            hash_cwd: false,
            mode: Mode::Run,
            verbose: false,
        }
    }

    /// Parse and apply a bucket width string
    pub fn with_bucket(mut self, width: &str) -> Result<Self> {
        self.bucket = width.parse()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_hash_cwd(mut self, hash_cwd: bool) -> Self {
        self.hash_cwd = hash_cwd;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
