use std::env;
use std::path::PathBuf;

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "MEDIA_CACHE_DIR";

const CACHE_DIR_NAME: &str = "media-disk-cache";

/// Configuration for a [`crate::DiskCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskCacheConfig {
    pub cache_dir: PathBuf,
}

impl Default for DiskCacheConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./cache/media"));
        Self { cache_dir }
    }
}

impl DiskCacheConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(CACHE_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => Self {
                cache_dir: PathBuf::from(dir),
            },
            None => Self::default(),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}
