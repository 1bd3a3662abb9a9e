//! Error types for ipgeo.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for ipgeo operations.
///
/// Every variant is fatal for the load it occurs in: the previously
/// committed table stays live.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A data file could not be opened
    #[error("failed to open data file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for ipgeo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a single range record.
///
/// These never abort a load; the offending line is logged and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// AS id column is neither empty nor an integer
    #[error("invalid AS id: {0:?}")]
    InvalidAsId(String),

    /// All location, ISP and AS id columns are empty
    #[error("record carries no location or ISP metadata")]
    EmptyMetadata,

    /// Start address is neither IPv4 nor IPv6
    #[error("invalid start address: {0:?}")]
    InvalidAddress(String),
}
