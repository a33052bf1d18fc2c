use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while harvesting recipes
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A recipe document could not be serialized
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A recipe document could not be written to disk
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file or environment overrides were invalid
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A URL list file could not be read
    #[error("could not read URL file {path}: {source}")]
    UrlFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Neither positional URLs nor a URL file were supplied
    #[error("no URLs supplied")]
    NoUrls,
}
