//! CLI command implementations.

pub mod build;
pub mod manifest;
pub mod slugs;

pub use build::build_docs;
pub use slugs::print_slugs;

use anyhow::{Context, Result};
use rdme_core::Configuration;
use std::path::Path;

/// Load the configuration file, or the defaults when there is none
pub fn load_config(config_path: &Path) -> Result<Configuration> {
    if !config_path.exists() {
        tracing::info!("No config at {:?}; using defaults", config_path);
        return Ok(Configuration::default());
    }

    tracing::info!("Loading config from {:?}", config_path);
    Configuration::from_file(config_path).context("Failed to load configuration")
}
