//! Per-invocation cache state machine
//!
//! Lookup decides between replaying an entry, deleting it, or running the
//! command with its output tee'd into a staged file that is committed only
//! on a zero exit. Nothing here exits the process: the caller maps the
//! returned [`Outcome`] or error to an exit status.

use chrono::{DateTime, Utc};
use clicache_cache::{CacheKey, CachePaths, CacheStore, Lookup};
use clicache_core::{CommandLine, Error, Mode, Result, Settings};
use clicache_task::{CommandExecutor, ExitOutcome, TeeWriter};
use clicache_utils::tracing::cache_event;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How an invocation finished without an internal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Cached output was copied to standard output
    Replayed { bytes: u64 },
    /// The entry for the current bucket was removed
    Deleted,
    /// Delete was requested but there was no entry
    NothingToDelete,
    /// The command ran; its status is propagated
    Executed(ExitOutcome),
    /// The whole cache directory was cleared
    Purged { removed: usize },
}

impl Outcome {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Executed(exit) => exit.code(),
            Outcome::Replayed { .. }
            | Outcome::Deleted
            | Outcome::NothingToDelete
            | Outcome::Purged { .. } => 0,
        }
    }
}

/// Run one invocation against the real clock, working directory and
/// standard output.
pub fn run(
    settings: &Settings,
    command: &CommandLine,
    executor: &dyn CommandExecutor,
) -> Result<Outcome> {
    let working_dir = if settings.hash_cwd {
        Some(current_dir()?)
    } else {
        None
    };
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    run_at(
        settings,
        command,
        working_dir.as_deref().map(Path::as_os_str),
        Utc::now(),
        executor,
        &mut stdout,
    )
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| Error::file_system(".", "resolve working directory", e))
}

/// Run one invocation with explicit inputs
pub fn run_at(
    settings: &Settings,
    command: &CommandLine,
    working_dir: Option<&OsStr>,
    now: DateTime<Utc>,
    executor: &dyn CommandExecutor,
    stdout: &mut dyn Write,
) -> Result<Outcome> {
    let store = CacheStore::new(&settings.cache_dir);
    if settings.mode == Mode::Purge {
        let removed = store.purge()?;
        return Ok(Outcome::Purged { removed });
    }

    let key = CacheKey::for_command(command, working_dir);
    let paths = store.paths(key, now, settings.bucket);
    let lookup = store.lookup(&paths)?;
    cache_event(&key.to_string(), lookup == Lookup::Hit, &paths.entry);

    match (lookup, settings.mode) {
        (Lookup::Miss, Mode::Delete) => Ok(Outcome::NothingToDelete),
        (Lookup::Hit, Mode::Delete) => {
            store.remove(&paths)?;
            debug!(path = %paths.entry.display(), "deleted cache entry");
            Ok(Outcome::Deleted)
        }
        (Lookup::Hit, _) => {
            let bytes = store.replay(&paths, stdout)?;
            Ok(Outcome::Replayed { bytes })
        }
        (Lookup::Miss, _) => execute_and_cache(&store, &paths, command, executor, stdout),
    }
}

fn execute_and_cache(
    store: &CacheStore,
    paths: &CachePaths,
    command: &CommandLine,
    executor: &dyn CommandExecutor,
    stdout: &mut dyn Write,
) -> Result<Outcome> {
    let program = executor.locate(command)?;
    let mut staged = store.stage(paths)?;

    let result = {
        let mut tee = TeeWriter::new(&mut *stdout, &mut staged);
        executor.execute(&program, command, &mut tee)
    };

    match result {
        Ok(exit) if exit.success() => {
            staged.commit()?;
            Ok(Outcome::Executed(exit))
        }
        Ok(exit) => {
            debug!(code = exit.code(), "command failed, not caching output");
            if let Err(e) = staged.discard() {
                warn!("{e}");
            }
            Ok(Outcome::Executed(exit))
        }
        Err(e) => {
            if let Err(discard_err) = staged.discard() {
                warn!("{discard_err}");
            }
            Err(e)
        }
    }
}
