//! Atomic file operations to prevent corrupted cache files

use clicache_core::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Flush and sync a fully written temporary file, then rename it over `path`.
///
/// Readers of `path` see either the previous file or the complete new one.
/// On any failure the temporary file is dropped, which removes it.
pub fn commit_atomic(mut file: NamedTempFile, path: &Path) -> Result<()> {
    let temp_path = file.path().to_path_buf();

    file.flush()
        .map_err(|e| Error::file_system(&temp_path, "flush temporary file", e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| Error::file_system(&temp_path, "sync temporary file", e))?;

    file.persist(path)
        .map_err(|e| Error::file_system(path.to_path_buf(), "atomic rename", e.error))?;

    Ok(())
}

/// Remove a file, treating an already missing file as success
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::file_system(path.to_path_buf(), "remove", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("entry.stdout");

        let mut file = NamedTempFile::new_in(temp_dir.path()).unwrap();
        let temp_path = file.path().to_path_buf();
        file.write_all(b"Hello, World!").unwrap();
        commit_atomic(file, &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Hello, World!");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_commit_atomic_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("entry.stdout");
        fs::write(&file_path, "Old content").unwrap();

        let mut file = NamedTempFile::new_in(temp_dir.path()).unwrap();
        file.write_all(b"New content").unwrap();
        commit_atomic(file, &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "New content");
    }

    #[test]
    fn test_commit_atomic_cleans_up_when_rename_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing").join("entry.stdout");

        let file = NamedTempFile::new_in(temp_dir.path()).unwrap();
        let temp_path = file.path().to_path_buf();
        let result = commit_atomic(file, &file_path);

        assert!(matches!(result, Err(Error::FileSystem { .. })));
        assert!(!temp_path.exists());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.tmp");
        remove_if_exists(&path).unwrap();

        fs::write(&path, "x").unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
