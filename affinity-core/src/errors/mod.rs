//! Error types for every Affinity subsystem.

mod analysis_error;
mod config_error;
mod storage_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use storage_error::StorageError;

/// Result alias used across the workspace.
pub type AffinityResult<T> = Result<T, AffinityError>;

/// Umbrella error for the Affinity engine.
#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("transaction conflict on {resource} after {attempts} attempts")]
    TransactionConflict { resource: String, attempts: u32 },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("analysis error: {0}")]
    AnalysisError(#[from] AnalysisError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),
}
