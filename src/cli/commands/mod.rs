//! CLI command implementations.

pub mod chat;
pub mod demo;
pub mod serve;

use anyhow::Result;
use std::path::Path;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;

/// Load configuration from `path`, or from the default locations.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Load configuration and install the logger.
///
/// The returned logger must be kept alive for file output to be flushed.
pub fn bootstrap(path: Option<&Path>) -> Result<(Config, LoggerImpl)> {
    let config = load_config(path)?;
    let logger = LoggerImpl::init(&config.logging)?;
    Ok((config, logger))
}
