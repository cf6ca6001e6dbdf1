//! Error types for the infra registry

use crate::entities::{ApplicationId, ProjectId, TeamId, UserId};
use thiserror::Error;

/// Registry-specific errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound(id.to_string())
    }

    pub fn project_not_found(id: ProjectId) -> Self {
        Self::ProjectNotFound(id.to_string())
    }

    pub fn team_not_found(id: TeamId) -> Self {
        Self::TeamNotFound(id.to_string())
    }

    pub fn application_not_found(id: ApplicationId) -> Self {
        Self::ApplicationNotFound(id.to_string())
    }

    /// True for any of the per-entity not-found variants
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ProjectNotFound(_)
                | Self::TeamNotFound(_)
                | Self::ApplicationNotFound(_)
        )
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
