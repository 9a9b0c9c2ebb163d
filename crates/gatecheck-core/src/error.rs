//! Error types for gate configuration.
//!
//! Only configuration problems are `Err` values: a gate that ran and
//! failed, or could not be started, is ordinary data flowing through
//! the pipeline (see [`crate::gate::GateStatus`]).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatecheckError {
    #[error("gate definition has an empty name")]
    EmptyGateName,

    #[error("gate '{gate}' has an empty command")]
    EmptyGateCommand { gate: String },

    #[error("duplicate gate name: '{name}'")]
    DuplicateGate { name: String },

    #[error("failed to read gate config {path:?}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gate config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for gate configuration operations
pub type Result<T> = std::result::Result<T, GatecheckError>;
