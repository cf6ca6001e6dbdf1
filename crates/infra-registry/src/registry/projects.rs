use super::{UserRegistry, require, require_text};
use crate::{
    entities::{Project, ProjectId},
    error::{RegistryError, Result},
    page::{Page, PageRequest},
    storage::ProjectStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Fields accepted by [`ProjectRegistry::update`]
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: String,
    /// Written only when present
    pub description: Option<String>,
    /// Required: the owner is re-resolved on every update
    pub owner_name: Option<String>,
}

/// Registry for projects, each owned by exactly one user
#[derive(Clone)]
pub struct ProjectRegistry {
    store: Arc<dyn ProjectStore>,
    users: UserRegistry,
}

impl ProjectRegistry {
    pub fn new(store: Arc<dyn ProjectStore>, users: UserRegistry) -> Self {
        Self { store, users }
    }

    /// Create a project owned by the first user named `owner_name`
    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        owner_name: Option<String>,
    ) -> Result<Project> {
        let name = require_text(name, "Project name")?;
        let owner_name = require(owner_name, "Project owner name")?;
        let owner = self.users.get_by_name(&owner_name).await?;

        let project = self
            .store
            .insert_project(name, description.as_deref(), owner.id)
            .await?;
        info!(
            "Created project {} ({}) owned by user {}",
            project.id, project.name, owner.id
        );
        Ok(project)
    }

    pub async fn get(&self, id: ProjectId) -> Result<Project> {
        debug!("Getting project {}", id);
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| RegistryError::project_not_found(id))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Project> {
        let name = require_text(name, "Project name")?;
        self.store
            .find_project_by_name(name)
            .await?
            .ok_or_else(|| RegistryError::ProjectNotFound(name.to_string()))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Project>> {
        self.store.list_projects(page).await
    }

    /// Update a project. The owner is always replaced, so `owner_name` is required.
    pub async fn update(&self, id: ProjectId, update: ProjectUpdate) -> Result<Project> {
        let owner_name = require(update.owner_name, "Project owner name")?;
        require_text(&update.name, "Project name")?;

        let mut project = self.get(id).await?;
        let owner = self.users.get_by_name(&owner_name).await?;

        project.name = update.name;
        if let Some(description) = update.description {
            project.description = Some(description);
        }
        project.owner_id = owner.id;

        let project = self.store.update_project(&project).await?;
        info!("Updated project {}", project.id);
        Ok(project)
    }

    /// Remove a project. Applications referencing it are not checked.
    pub async fn delete(&self, id: ProjectId) -> Result<()> {
        self.store.delete_project(id).await?;
        info!("Deleted project {}", id);
        Ok(())
    }
}
