//! Command-line interface for the media cache

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// media-cache - populate and inspect a media disk cache
#[derive(Parser, Debug)]
#[command(name = "media-cache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache directory (overrides MEDIA_CACHE_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Store the contents of a file under KEY and print its locator
    Store {
        /// Cache key, usually the URL the media was fetched from
        key: String,

        /// File holding the bytes to cache
        file: PathBuf,
    },

    /// Point KEY at bytes that already exist elsewhere
    Register {
        /// Cache key
        key: String,

        /// Absolute URL or absolute path of the existing bytes
        locator: String,
    },

    /// Print the locator for KEY, exit 1 if there is none
    Lookup {
        /// Cache key
        key: String,
    },

    /// Print cache statistics as JSON
    Stats,
}
