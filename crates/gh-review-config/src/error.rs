//! Configuration errors
//!
//! Every variant is fatal: the bot cannot make a decision without a valid
//! configuration, so nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Missing or invalid required input
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was not supplied by any source
    #[error("missing required value '{key}': {hint}")]
    Missing { key: &'static str, hint: &'static str },

    /// The reviewer assignments could not be parsed
    #[error("invalid reviewer assignments: {reason}")]
    InvalidReviewers { reason: String },

    /// A value was present but malformed
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// The config file exists but is not valid TOML
    #[error("failed to parse config file {}", path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The event payload could not be read
    #[error("failed to read event payload {}", path.display())]
    EventRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The event payload is not the expected JSON shape
    #[error("failed to parse event payload {}", path.display())]
    EventParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
