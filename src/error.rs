//! Engine error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// program_data is missing its `weeks` array or does not fit the plan tree
    #[error("Malformed program data: {0}")]
    MalformedProgram(String),

    #[error("Version {version_number} is not the active version")]
    InactiveVersion { version_number: u32 },

    #[error("Unsupported coach action: {0}")]
    UnsupportedAction(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
