use thiserror::Error;

use crate::types::ScenarioId;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Scenario {id} not found")]
    NotFound { id: ScenarioId },

    #[error("Scenario name '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RoiError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field:  field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type RoiResult<T> = Result<T, RoiError>;
