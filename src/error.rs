//! Error types for the few fallible operations.
//!
//! Nothing here is fatal: event handlers log these and carry on.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid root margin {0:?}: expected 1 to 4 lengths in px or %")]
    InvalidRootMargin(String),

    #[error("storage write for key {key:?} failed: {reason}")]
    Storage { key: String, reason: String },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("unknown social platform {0:?}")]
    UnknownPlatform(String),

    #[error("host error: {0}")]
    Host(String),
}
