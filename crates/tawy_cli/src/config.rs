//! Carousel configuration file handling
//!
//! The CLI reads the same `carousel.toml` the site ships with. Commands that
//! can run without one fall back to the sample configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tawy_cn::CarouselConfig;

/// Default configuration file name
pub const CONFIG_FILE: &str = "carousel.toml";

/// Load a configuration file
pub fn load(path: &Path) -> Result<CarouselConfig> {
    CarouselConfig::load_from_path(path)
        .with_context(|| format!("Failed to load carousel configuration from {}", path.display()))
}

/// Load `path` if given, otherwise the sample configuration
pub fn load_or_sample(path: Option<&Path>) -> Result<CarouselConfig> {
    match path {
        Some(path) => load(path),
        None => Ok(CarouselConfig::sample()),
    }
}

/// Load and validate, turning inconsistencies into errors
pub fn load_validated(path: &Path) -> Result<CarouselConfig> {
    let config = load(path)?;
    config
        .validate()
        .with_context(|| format!("Invalid carousel configuration in {}", path.display()))?;
    Ok(config)
}

/// Write the sample configuration to `path`
///
/// Refuses to overwrite an existing file.
pub fn write_sample(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let content = CarouselConfig::sample()
        .to_toml()
        .context("Failed to serialize sample configuration")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
