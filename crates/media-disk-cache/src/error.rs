//! Error types for the media disk cache

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CacheError {
    InvalidArgument(String),
    StorageWrite { path: PathBuf, source: io::Error },
    Io(Box<io::Error>),
    Index(String),
}

impl CacheError {
    pub(crate) fn storage_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CacheError::StorageWrite {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CacheError::StorageWrite { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            CacheError::Io(err) => write!(f, "IO error: {}", err),
            CacheError::Index(msg) => write!(f, "Registration index error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::StorageWrite { source, .. } => Some(source),
            CacheError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::Io(Box::new(err))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Index(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_argument_display() {
        let err = CacheError::InvalidArgument("cache key must not be empty".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid argument: cache key must not be empty"
        );
    }

    #[test]
    fn test_storage_write_display_and_source() {
        let err = CacheError::storage_write(
            "/cache/abc123",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = format!("{}", err);
        assert!(msg.contains("/cache/abc123"));
        assert!(msg.contains("permission denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CacheError = io::Error::other("disk on fire").into();
        assert!(matches!(err, CacheError::Io(_)));
        assert_eq!(format!("{}", err), "IO error: disk on fire");
    }

    #[test]
    fn test_error_is_debug() {
        let err = CacheError::Index("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Index"));
    }
}
