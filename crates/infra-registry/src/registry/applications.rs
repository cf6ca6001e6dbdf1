use super::{ProjectRegistry, TeamRegistry, require, require_text};
use crate::{
    entities::{Application, ApplicationId, ProjectId, TeamId},
    error::{RegistryError, Result},
    page::{Page, PageRequest},
    storage::ApplicationStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Fields accepted by [`ApplicationRegistry::update`]
///
/// Absent optional fields leave the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    /// Always written
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<TeamId>,
    pub project_id: Option<ProjectId>,
}

/// Registry for applications, each bound to one team and one project
#[derive(Clone)]
pub struct ApplicationRegistry {
    store: Arc<dyn ApplicationStore>,
    teams: TeamRegistry,
    projects: ProjectRegistry,
}

impl ApplicationRegistry {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        teams: TeamRegistry,
        projects: ProjectRegistry,
    ) -> Self {
        Self {
            store,
            teams,
            projects,
        }
    }

    /// Create an application after resolving its team, then its project.
    /// Nothing is written when either lookup fails.
    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        team_id: Option<TeamId>,
        project_id: Option<ProjectId>,
    ) -> Result<Application> {
        let name = require_text(name, "Application name")?;
        let team_id = require(team_id, "Team id")?;
        let project_id = require(project_id, "Project id")?;
        let team = self.teams.get(team_id).await?;
        let project = self.projects.get(project_id).await?;

        let application = self
            .store
            .insert_application(name, description.as_deref(), team.id, project.id)
            .await?;
        info!(
            "Created application {} ({}) for team {} and project {}",
            application.id, application.name, team.id, project.id
        );
        Ok(application)
    }

    pub async fn get(&self, id: ApplicationId) -> Result<Application> {
        debug!("Getting application {}", id);
        self.store
            .find_application(id)
            .await?
            .ok_or_else(|| RegistryError::application_not_found(id))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Application>> {
        self.store.list_applications(page).await
    }

    pub async fn update(&self, id: ApplicationId, update: ApplicationUpdate) -> Result<Application> {
        require_text(&update.name, "Application name")?;
        let mut application = self.get(id).await?;

        if let Some(team_id) = update.team_id {
            application.team_id = self.teams.get(team_id).await?.id;
        }
        if let Some(project_id) = update.project_id {
            application.project_id = self.projects.get(project_id).await?.id;
        }
        if let Some(description) = update.description {
            application.description = Some(description);
        }
        application.name = update.name;

        self.store.update_application(&application).await?;
        info!("Updated application {}", application.id);
        Ok(application)
    }

    /// Remove an application
    pub async fn delete(&self, id: ApplicationId) -> Result<()> {
        self.store.delete_application(id).await?;
        info!("Deleted application {}", id);
        Ok(())
    }
}
