//! File-based media cache with persisted registrations

use crate::config::DiskCacheConfig;
use crate::derive;
use crate::error::{CacheError, Result};
use crate::index::RegistrationIndex;
use crate::io;
use crate::types::{CacheKey, CacheStats, Locator, StoredEntry};
use chrono::Utc;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// A disk cache mapping keys to files
///
/// One instance per cache directory. All methods take `&self` and may be
/// called from many threads at once; share it behind an `Arc`.
pub struct DiskCache {
    /// Directory where cached blobs are stored
    cache_dir: PathBuf,
    /// Keys registered against locators the cache did not write
    registrations: RwLock<RegistrationIndex>,
    /// Cache hit counter
    hits: AtomicU64,
    /// Cache miss counter
    misses: AtomicU64,
}

impl DiskCache {
    /// Open the cache rooted at `cache_dir`, creating the directory if needed
    pub fn open(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = std::path::absolute(cache_dir.as_ref())?;
        fs::create_dir_all(&cache_dir)?;

        let registrations = RegistrationIndex::load(&cache_dir);
        info!(
            cache_dir = ?cache_dir,
            registrations = registrations.len(),
            "Cache opened"
        );

        Ok(Self {
            cache_dir,
            registrations: RwLock::new(registrations),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn from_config(config: &DiskCacheConfig) -> Result<Self> {
        Self::open(&config.cache_dir)
    }

    pub fn root(&self) -> &Path {
        &self.cache_dir
    }

    /// The locator `store` writes `key` to, whether or not it exists yet
    pub fn locator_for(&self, key: &CacheKey) -> Result<Locator> {
        Locator::from_path(&derive::path_in(&self.cache_dir, key))
    }

    /// Store a blob and return where it can be read from
    ///
    /// Replaces any earlier blob or registration for `key`. On failure the
    /// previous entry, if any, stays readable.
    pub fn store(&self, data: &[u8], key: &CacheKey) -> Result<Locator> {
        if data.is_empty() {
            return Err(CacheError::InvalidArgument(
                "cannot store an empty payload".to_string(),
            ));
        }

        let path = derive::path_in(&self.cache_dir, key);
        let locator = Locator::from_path(&path)?;

        let staged = io::stage(&path, data).map_err(|e| {
            warn!(key = %key, error = %e, "Failed to write blob");
            e
        })?;

        {
            let mut registrations = self.registrations.write();

            io::commit(staged, &path).map_err(|e| {
                warn!(key = %key, error = %e, "Failed to publish blob");
                e
            })?;

            if let Some(previous) = registrations.remove(key) {
                if let Err(e) = registrations.save(&self.cache_dir) {
                    warn!(key = %key, error = %e, "Failed to drop registration, keeping it");
                    registrations.insert(previous);
                    return Err(e);
                }
            }
        }

        debug!(key = %key, size = data.len(), path = ?path, "Stored blob");
        Ok(locator)
    }

    /// Point `key` at bytes that already live at `locator`
    ///
    /// No data is written; only the association is persisted.
    pub fn register(&self, locator: Locator, key: &CacheKey) -> Result<()> {
        let entry = StoredEntry {
            key: key.clone(),
            locator,
            registered_at: Utc::now(),
        };

        let mut registrations = self.registrations.write();
        let previous = registrations.insert(entry);

        if let Err(e) = registrations.save(&self.cache_dir) {
            warn!(key = %key, error = %e, "Failed to persist registration");
            match previous {
                Some(previous) => {
                    registrations.insert(previous);
                }
                None => {
                    registrations.remove(key);
                }
            }
            return Err(e);
        }

        debug!(key = %key, "Registered locator");
        Ok(())
    }

    /// Resolve `key` to the locator of its bytes
    pub fn lookup(&self, key: &CacheKey) -> Option<Locator> {
        match self.resolve(key) {
            Some(locator) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Some(locator)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.resolve(key).is_some()
    }

    /// Read the bytes behind `key`
    ///
    /// Returns `None` when the key is unknown, its file has been purged, or
    /// it is registered against a non-file locator.
    pub fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let Some(locator) = self.lookup(key) else {
            return Ok(None);
        };

        let Some(path) = locator.to_file_path() else {
            debug!(key = %key, locator = %locator, "Locator is not a local file");
            return Ok(None);
        };

        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, path = ?path, "Cached file is gone");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get current cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut entries = 0;
        let mut total_size = 0;

        match fs::read_dir(&self.cache_dir) {
            Ok(dir) => {
                for item in dir {
                    let item = item?;
                    let name = item.file_name();
                    if !name.to_str().is_some_and(derive::is_data_file_name) {
                        continue;
                    }
                    let metadata = item.metadata()?;
                    if metadata.is_file() {
                        entries += 1;
                        total_size += metadata.len();
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(CacheStats {
            entries,
            total_size,
            registrations: self.registrations.read().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }

    fn resolve(&self, key: &CacheKey) -> Option<Locator> {
        if let Some(entry) = self.registrations.read().get(key) {
            return Some(entry.locator.clone());
        }

        let path = derive::path_in(&self.cache_dir, key);
        if !path.is_file() {
            return None;
        }
        Locator::from_path(&path).ok()
    }
}
