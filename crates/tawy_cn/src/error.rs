//! Error types for tawy_cn

use std::path::PathBuf;

use tawy_layout::LayoutError;
use thiserror::Error;

/// Problems with a carousel configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two slides share an id, so DOM attribution would be ambiguous
    #[error("duplicate slide id: {0}")]
    DuplicateSlideId(u32),

    /// Auto-play is enabled with a zero interval
    #[error("autoPlayInterval must be greater than zero when autoPlay is enabled")]
    ZeroInterval,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse carousel configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize carousel configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors raised while attaching a carousel to a page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// No element with the requested id exists in the document
    #[error("carousel container not found: #{0}")]
    ContainerNotFound(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
