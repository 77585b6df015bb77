//! Unified error types for arbor.

use crate::types::Stage;
use thiserror::Error;

/// The main error type for arbor operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Problem data violates the packing form (negative or non-finite data, bad indices).
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Operation called while the model is in the wrong stage.
    #[error("Invalid stage: expected {expected}, got {actual}")]
    InvalidStage {
        expected: &'static str,
        actual: Stage,
    },

    /// Action outside of the current action set.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Environment used out of order (e.g. stepping before a reset).
    #[error("Environment error: {0}")]
    Environment(String),

    /// Branch-and-bound or LP failure.
    #[error("Solver error: {0}")]
    Solver(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
