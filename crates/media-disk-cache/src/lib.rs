//! Key-addressed disk cache for media payloads
//!
//! Stores already-fetched bytes under a URL-like key and hands back a
//! locator (a `file://` URL) the bytes can be read from. Callers that wrote
//! bytes elsewhere can register an existing locator for a key instead.
//! Entries survive restarts: stored files live at a path derived from the
//! key, registrations are persisted next to them.

mod cache;
mod config;
pub mod derive;
mod error;
mod index;
mod io;
mod types;

pub use cache::DiskCache;
pub use config::{DiskCacheConfig, CACHE_DIR_ENV};
pub use error::{CacheError, Result};
pub use types::{CacheKey, CacheStats, Locator, StoredEntry};
