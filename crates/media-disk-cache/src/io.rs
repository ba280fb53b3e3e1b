//! Atomic write helpers
//!
//! Bytes are written to a temporary file in the destination directory,
//! flushed, and renamed over the destination. Readers only ever observe
//! complete files.

use crate::error::{CacheError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Prefix of in-flight temporary files in the cache directory
pub(crate) const TEMP_PREFIX: &str = ".tmp";

/// Write `data` to a temporary file next to `path`, ready to be committed
pub(crate) fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .ok_or_else(|| CacheError::InvalidArgument(format!("no parent: {}", path.display())))?;

    fs::create_dir_all(dir).map_err(|e| CacheError::storage_write(dir, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| CacheError::storage_write(path, e))?;

    tmp.write_all(data)
        .map_err(|e| CacheError::storage_write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| CacheError::storage_write(path, e))?;

    Ok(tmp)
}

/// Atomically move a staged file to `path`
///
/// On failure the temporary file is removed and `path` is left untouched.
pub(crate) fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map_err(|e| CacheError::storage_write(path, e.error))?;
    Ok(())
}

pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let staged = stage(path, data)?;
    commit(staged, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn leftover_temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .count()
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");

        write_atomic(&path, b"first version").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("blob");

        write_atomic(&path, b"data").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_staged_file_invisible_until_commit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");

        let staged = stage(&path, b"pending").unwrap();
        assert!(!path.exists());

        commit(staged, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"pending");
    }

    #[test]
    fn test_dropped_stage_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");

        drop(stage(&path, b"abandoned").unwrap());

        assert!(!path.exists());
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn test_commit_failure_keeps_destination() {
        let dir = tempdir().unwrap();
        // A non-empty directory at the destination cannot be replaced by a file
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), b"x").unwrap();

        let staged = stage(&path, b"data").unwrap();
        let err = commit(staged, &path).unwrap_err();

        assert!(matches!(err, CacheError::StorageWrite { .. }));
        assert!(path.is_dir());
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }
}
