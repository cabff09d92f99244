//! On-disk cache store: lookup, replay, removal and staged writes

use crate::keys::CacheKey;
use crate::paths::{is_cache_artifact, CachePaths};
use chrono::{DateTime, Utc};
use clicache_core::{BucketWidth, Error, Result, TEMP_FILE_SUFFIX};
use clicache_utils::{commit_atomic, remove_if_exists};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Result of checking for an entry in the current bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
}

/// Flat directory of `{key}-{bucket}.stdout` files
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Paths for `key` in the bucket containing `at`
    pub fn paths(&self, key: CacheKey, at: DateTime<Utc>, width: BucketWidth) -> CachePaths {
        CachePaths::derive(&self.dir, key, at, width)
    }

    /// Stat the entry. Only "not found" counts as a miss; any other
    /// failure is an error.
    pub fn lookup(&self, paths: &CachePaths) -> Result<Lookup> {
        match fs::metadata(&paths.entry) {
            Ok(_) => Ok(Lookup::Hit),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Lookup::Miss),
            Err(e) => Err(Error::file_system(&paths.entry, "stat", e)),
        }
    }

    /// Copy the entry verbatim into `out`, returning the byte count
    pub fn replay(&self, paths: &CachePaths, out: &mut dyn Write) -> Result<u64> {
        let mut file = fs::File::open(&paths.entry)
            .map_err(|e| Error::file_system(&paths.entry, "open", e))?;
        let copied = io::copy(&mut file, &mut *out)
            .map_err(|e| Error::io(format!("replaying '{}'", paths.entry.display()), e))?;
        out.flush()
            .map_err(|e| Error::io("flushing standard output", e))?;
        Ok(copied)
    }

    /// Remove the entry
    pub fn remove(&self, paths: &CachePaths) -> Result<()> {
        remove_if_exists(&paths.entry)
    }

    /// Create the cache directory if needed and open the temporary file
    /// for this invocation.
    pub fn stage(&self, paths: &CachePaths) -> Result<StagedEntry> {
        create_private_dir(&self.dir)?;

        let file_name = paths
            .staging
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = file_name
            .strip_suffix(TEMP_FILE_SUFFIX)
            .unwrap_or(&file_name);

        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(TEMP_FILE_SUFFIX)
            .rand_bytes(0)
            .tempfile_in(&self.dir)
            .map_err(|e| Error::file_system(&paths.staging, "create temporary file", e))?;

        debug!(path = %file.path().display(), "staging cache entry");
        Ok(StagedEntry {
            file,
            entry: paths.entry.clone(),
        })
    }

    /// Remove every cache entry and temporary file in the directory.
    ///
    /// Files that do not look like cache artifacts are left alone. A
    /// missing directory counts as already empty.
    pub fn purge(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::file_system(&self.dir, "read directory", e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| Error::file_system(&self.dir, "read directory", e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let name = entry.file_name();
            if !is_file || !name.to_str().is_some_and(is_cache_artifact) {
                continue;
            }
            remove_if_exists(&entry.path())?;
            removed += 1;
        }

        debug!(dir = %self.dir.display(), removed, "purged cache directory");
        Ok(removed)
    }
}

/// Temporary file receiving a run's standard output.
///
/// Dropping it without calling [`StagedEntry::commit`] deletes the file.
#[derive(Debug)]
pub struct StagedEntry {
    file: NamedTempFile,
    entry: PathBuf,
}

impl StagedEntry {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Sync the file and rename it over the entry path
    pub fn commit(self) -> Result<()> {
        debug!(path = %self.entry.display(), "committing cache entry");
        commit_atomic(self.file, &self.entry)
    }

    /// Delete the temporary file without creating an entry
    pub fn discard(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        debug!(path = %path.display(), "discarding temporary file");
        self.file
            .close()
            .map_err(|e| Error::file_system(path, "remove temporary file", e))
    }
}

impl Write for StagedEntry {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| Error::file_system(dir, "create directory", e))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, "create directory", e))
}
