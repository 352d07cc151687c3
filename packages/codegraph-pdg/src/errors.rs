//! Error types for codegraph-pdg
//!
//! Provides unified error handling across the crate. Conditions the pipeline
//! recovers from (unmapped nodes, unresolved anchors, missing exit blocks) are
//! logged and never surface here.

use crate::config::ConfigError;
use crate::features::data_flow::DataflowError;
use thiserror::Error;

/// Main error type for codegraph-pdg operations
#[derive(Debug, Error)]
pub enum PdgError {
    /// Malformed tree or CFG handed over by the front end
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataflow analysis failure
    #[error("Dataflow error: {0}")]
    Dataflow(#[from] DataflowError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdgError {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        PdgError::InvalidInput(msg.into())
    }

    /// Internal-consistency violations, as opposed to bad input or environment
    pub fn is_fatal(&self) -> bool {
        matches!(self, PdgError::Dataflow(e) if e.is_fatal())
    }
}

/// Result type alias for PDG operations
pub type Result<T> = std::result::Result<T, PdgError>;
