//! media-cache - command-line access to a media disk cache
//!
//! Stores files under URL-like keys, registers existing locators, and
//! resolves keys back to locators. Logs go to stderr; results go to stdout.

mod cli;
mod commands;
mod error;

use crate::cli::Cli;
use crate::commands::Output;
use crate::error::Result;
use clap::Parser;
use media_disk_cache::{DiskCache, DiskCacheConfig};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(Output::Line(line)) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Ok(Output::Silent) => ExitCode::SUCCESS,
        Ok(Output::NotFound) => {
            eprintln!("not found");
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::from(2)
        }
    }
}

fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("media_cache=info".parse()?)
        .add_directive("media_disk_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    Ok(())
}

fn run(cli: Cli) -> Result<Output> {
    let mut config = DiskCacheConfig::from_env();
    if let Some(cache_dir) = cli.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }
    debug!(cache_dir = ?config.cache_dir, "Using cache directory");

    let cache = DiskCache::from_config(&config)?;
    commands::run(&cache, cli.command)
}
