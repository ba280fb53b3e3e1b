//! Key to file name derivation
//!
//! The file a key is stored in is a pure function of the key: the SHA-256
//! of the key as lowercase hex, plus the key's path extension when it has a
//! short alphanumeric one. Media players sniff the extension, so
//! `https://cdn.example.com/clip.MP4?token=x` lands in `<sha256>.mp4`.

use crate::types::CacheKey;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Length of the hex digest prefix of every data file name
pub const DIGEST_LEN: usize = 64;

/// Longest extension carried over from a key
pub const MAX_EXTENSION_LEN: usize = 8;

/// File name the bytes for `key` are stored under
pub fn file_name(key: &CacheKey) -> String {
    let digest = hex::encode(Sha256::digest(key.as_str().as_bytes()));
    match extension(key.as_str()) {
        Some(ext) => format!("{}.{}", digest, ext),
        None => digest,
    }
}

/// Full path of the data file for `key` under `root`
pub fn path_in(root: &Path, key: &CacheKey) -> PathBuf {
    root.join(file_name(key))
}

/// Extension of the last path segment of a URL-like key, lowercased
pub fn extension(key: &str) -> Option<String> {
    let path = match Url::parse(key) {
        Ok(url) => url.path().to_string(),
        Err(_) => key.split(['?', '#']).next().unwrap_or(key).to_string(),
    };

    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Whether `name` has the shape of a name produced by [`file_name`]
pub fn is_data_file_name(name: &str) -> bool {
    let Some(digest) = name.get(..DIGEST_LEN) else {
        return false;
    };
    if !digest
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    {
        return false;
    }

    match &name[DIGEST_LEN..] {
        "" => true,
        rest => rest.strip_prefix('.').is_some_and(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        }),
    }
}
