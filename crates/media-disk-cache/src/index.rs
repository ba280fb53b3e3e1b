//! Persisted registrations of externally stored locators

use crate::error::Result;
use crate::io::write_atomic;
use crate::types::{CacheKey, StoredEntry};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

pub(crate) const INDEX_FILE_NAME: &str = "registrations.json";

/// In-memory view of `registrations.json`
#[derive(Debug, Default)]
pub(crate) struct RegistrationIndex {
    entries: HashMap<CacheKey, StoredEntry>,
}

impl RegistrationIndex {
    /// Load the index from `root`, starting empty if it is missing or unreadable
    pub(crate) fn load(root: &Path) -> Self {
        let path = root.join(INDEX_FILE_NAME);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read registration index, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_slice::<Vec<StoredEntry>>(&raw) {
            Ok(list) => Self {
                entries: list.into_iter().map(|e| (e.key.clone(), e)).collect(),
            },
            Err(e) => {
                warn!(path = ?path, error = %e, "Corrupt registration index, starting empty");
                Self::default()
            }
        }
    }

    /// Write the index to `root` atomically
    pub(crate) fn save(&self, root: &Path) -> Result<()> {
        let mut list: Vec<&StoredEntry> = self.entries.values().collect();
        list.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));

        let json = serde_json::to_vec_pretty(&list)?;
        write_atomic(&root.join(INDEX_FILE_NAME), &json)
    }

    pub(crate) fn get(&self, key: &CacheKey) -> Option<&StoredEntry> {
        self.entries.get(key)
    }

    pub(crate) fn insert(&mut self, entry: StoredEntry) -> Option<StoredEntry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    pub(crate) fn remove(&mut self, key: &CacheKey) -> Option<StoredEntry> {
        self.entries.remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
