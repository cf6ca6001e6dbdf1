//! Application request and response models

use super::api::require_text;
use crate::error::Result;
use infra_registry::{Application, ApplicationUpdate, ProjectId, TeamId};
use serde::{Deserialize, Serialize};

/// Request to create or update an application
///
/// On update, absent `description`, `team_id` and `project_id` keep the
/// stored values.
#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "appTeamId")]
    pub team_id: Option<i64>,
    #[serde(alias = "projectId")]
    pub project_id: Option<i64>,
}

impl ApplicationRequest {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id.map(TeamId)
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id.map(ProjectId)
    }
}

impl From<ApplicationRequest> for ApplicationUpdate {
    fn from(request: ApplicationRequest) -> Self {
        Self {
            team_id: request.team_id(),
            project_id: request.project_id(),
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub team_id: i64,
    pub project_id: i64,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id.0,
            name: app.name,
            description: app.description,
            team_id: app.team_id.0,
            project_id: app.project_id.0,
        }
    }
}
