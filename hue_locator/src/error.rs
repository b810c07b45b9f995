use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong inside the locator library.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("crop window {window} is empty for a {width}x{height} frame")]
    EmptyCrop {
        window: String,
        width: u32,
        height: u32,
    },
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),
}

pub type LocatorResult<T> = Result<T, LocatorError>;
