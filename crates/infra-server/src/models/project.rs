//! Project request and response models

use super::api::require_text;
use crate::error::Result;
use infra_registry::{Project, ProjectUpdate};
use serde::{Deserialize, Serialize};

/// Request to create or update a project
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "ownerName")]
    pub owner_name: Option<String>,
}

impl ProjectRequest {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")
    }
}

impl From<ProjectRequest> for ProjectUpdate {
    fn from(request: ProjectRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            owner_name: request.owner_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    /// Absent when the owning user has been deleted
    pub owner_name: Option<String>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.0,
            name: project.name,
            description: project.description,
            owner_id: project.owner_id.0,
            owner_name: project.owner_name,
        }
    }
}
