//! Cache types

use crate::error::{CacheError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Identifier of a cached resource, usually the URL it was fetched from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CacheError::InvalidArgument(
                "cache key must not be empty".to_string(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheKey {
    type Error = CacheError;

    fn try_from(key: String) -> Result<Self> {
        Self::new(key)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl From<&Url> for CacheKey {
    fn from(url: &Url) -> Self {
        Self(url.as_str().to_string())
    }
}

impl FromStr for CacheKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the bytes for a key live
///
/// Locators the cache derives itself are always `file://` URLs inside the
/// cache directory. Registered locators may use any scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(Url);

impl Locator {
    /// Parse an absolute URL, or an absolute filesystem path
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(CacheError::InvalidArgument(
                "locator must not be empty".to_string(),
            ));
        }

        match Url::parse(s) {
            Ok(url) => Ok(Self(url)),
            Err(_) if Path::new(s).is_absolute() => Self::from_path(Path::new(s)),
            Err(e) => Err(CacheError::InvalidArgument(format!(
                "locator must be an absolute URL or path: {} ({})",
                s, e
            ))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Url::from_file_path(path).map(Self).map_err(|()| {
            CacheError::InvalidArgument(format!(
                "locator path must be absolute: {}",
                path.display()
            ))
        })
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Local path of a `file://` locator, `None` for any other scheme
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.0.scheme() != "file" {
            return None;
        }
        self.0.to_file_path().ok()
    }
}

impl From<Url> for Locator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for Locator {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A registered association between a key and an external locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub key: CacheKey,
    pub locator: Locator,
    pub registered_at: DateTime<Utc>,
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Data files written by `store`
    pub entries: usize,
    pub total_size: u64,
    pub registrations: usize,
    pub hits: u64,
    pub misses: u64,
}
