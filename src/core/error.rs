use thiserror::Error;

use crate::core::types::BoxerId;

#[derive(Error, Debug)]
pub enum CareerError {
    #[error("Invalid round count {rounds}: must be between 1 and {max}")]
    InvalidRounds { rounds: u32, max: u32 },

    #[error("Unknown organization: {0}")]
    UnknownOrganization(String),

    #[error("Unknown division: {0}")]
    UnknownDivision(String),

    #[error("Unknown boxer: {0}")]
    UnknownBoxer(BoxerId),

    #[error("No ranking configured for {organization} at {division}")]
    MissingRanking { organization: String, division: String },

    #[error("Malformed ranking for {organization} at {division}: {reason}")]
    MalformedRanking {
        organization: String,
        division: String,
        reason: String,
    },

    #[error("Ledger consistency violated: {0}")]
    Consistency(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Boxer {0} is retired")]
    BoxerRetired(BoxerId),

    #[error("Boxer {0} has not turned pro")]
    NotProfessional(BoxerId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl CareerError {
    /// Validation errors are raised before any mutation; state is unchanged.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CareerError::InvalidRounds { .. }
                | CareerError::UnknownOrganization(_)
                | CareerError::UnknownDivision(_)
                | CareerError::UnknownBoxer(_)
                | CareerError::MissingRanking { .. }
                | CareerError::MalformedRanking { .. }
                | CareerError::InvalidRequest(_)
                | CareerError::BoxerRetired(_)
                | CareerError::NotProfessional(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CareerError>;
