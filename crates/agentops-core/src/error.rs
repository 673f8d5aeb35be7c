//! Error types for agentops-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentOpsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("No {collection} record with id '{id}'")]
    RecordNotFound { collection: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, AgentOpsError>;
