//! Command execution against an open cache

use crate::cli::Command;
use crate::error::Result;
use media_disk_cache::{CacheKey, DiskCache, Locator};
use std::fs;
use tracing::info;

/// What a command wants printed
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    Line(String),
    Silent,
    NotFound,
}

pub fn run(cache: &DiskCache, command: Command) -> Result<Output> {
    match command {
        Command::Store { key, file } => {
            let key = CacheKey::new(key)?;
            let data = fs::read(&file)?;
            let locator = cache.store(&data, &key)?;
            info!(key = %key, size = data.len(), "Stored file");
            Ok(Output::Line(locator.to_string()))
        }
        Command::Register { key, locator } => {
            let key = CacheKey::new(key)?;
            let locator = Locator::parse(&locator)?;
            cache.register(locator, &key)?;
            Ok(Output::Silent)
        }
        Command::Lookup { key } => {
            let key = CacheKey::new(key)?;
            Ok(match cache.lookup(&key) {
                Some(locator) => Output::Line(locator.to_string()),
                None => Output::NotFound,
            })
        }
        Command::Stats => {
            let stats = cache.stats()?;
            let json = serde_json::to_string_pretty(&stats).map_err(std::io::Error::from)?;
            Ok(Output::Line(json))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tempfile::tempdir;

    #[test]
    fn test_store_then_lookup() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path().join("cache")).unwrap();
        let file = dir.path().join("clip.mp4");
        fs::write(&file, b"mp4 bytes").unwrap();

        let stored = run(
            &cache,
            Command::Store {
                key: "https://cdn.example.com/clip.mp4".to_string(),
                file,
            },
        )
        .unwrap();

        let found = run(
            &cache,
            Command::Lookup {
                key: "https://cdn.example.com/clip.mp4".to_string(),
            },
        )
        .unwrap();

        assert_eq!(stored, found);
        let Output::Line(locator) = found else {
            panic!("expected a locator");
        };
        assert!(locator.starts_with("file://"));
        assert!(locator.ends_with(".mp4"));
    }

    #[test]
    fn test_lookup_unknown_key() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        let output = run(
            &cache,
            Command::Lookup {
                key: "https://cdn.example.com/none.mp4".to_string(),
            },
        )
        .unwrap();
        assert_eq!(output, Output::NotFound);
    }

    #[test]
    fn test_register_then_lookup() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        let output = run(
            &cache,
            Command::Register {
                key: "https://cdn.example.com/live.m3u8".to_string(),
                locator: "https://mirror.example.com/live.m3u8".to_string(),
            },
        )
        .unwrap();
        assert_eq!(output, Output::Silent);

        let output = run(
            &cache,
            Command::Lookup {
                key: "https://cdn.example.com/live.m3u8".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            output,
            Output::Line("https://mirror.example.com/live.m3u8".to_string())
        );
    }

    #[test]
    fn test_register_rejects_relative_locator() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        let err = run(
            &cache,
            Command::Register {
                key: "https://cdn.example.com/a.mp4".to_string(),
                locator: "relative/a.mp4".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Cache(_)));
    }

    #[test]
    fn test_store_missing_file() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        let err = run(
            &cache,
            Command::Store {
                key: "https://cdn.example.com/a.mp4".to_string(),
                file: dir.path().join("does-not-exist"),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_stats_is_json() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        let Output::Line(json) = run(&cache, Command::Stats).unwrap() else {
            panic!("expected stats output");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"], 0);
        assert_eq!(value["registrations"], 0);
    }
}
