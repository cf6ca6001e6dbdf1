//! Storage abstraction for registry data
//!
//! One trait per entity table. Backends own id assignment and resolve the
//! derived fields (`Project::owner_name`, `Team::members`) on read.
//! Deletes are unguarded: no backend checks for dependent rows.

use crate::{entities::*, error::Result, page::{Page, PageRequest}};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

/// Persistence for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return it with its assigned id
    async fn insert_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// First user with this exact name, in id order
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>>;

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>>;

    /// Overwrite every column of an existing user
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Remove a user; unknown ids are ignored
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// Persistence for project records
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: UserId,
    ) -> Result<Project>;

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>>;

    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>>;

    async fn list_projects(&self, page: PageRequest) -> Result<Page<Project>>;

    /// Overwrite name, description and owner; returns the re-read project
    async fn update_project(&self, project: &Project) -> Result<Project>;

    async fn delete_project(&self, id: ProjectId) -> Result<()>;
}

/// Persistence for application teams and their membership
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Insert a team and its membership rows atomically
    async fn insert_team(
        &self,
        name: &str,
        description: Option<&str>,
        member_ids: &[UserId],
    ) -> Result<Team>;

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>>;

    async fn list_teams(&self, page: PageRequest) -> Result<Page<Team>>;

    /// Overwrite name and description and replace the whole membership set
    async fn update_team(&self, team: &Team) -> Result<Team>;

    async fn delete_team(&self, id: TeamId) -> Result<()>;
}

/// Persistence for application records
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_application(
        &self,
        name: &str,
        description: Option<&str>,
        team_id: TeamId,
        project_id: ProjectId,
    ) -> Result<Application>;

    async fn find_application(&self, id: ApplicationId) -> Result<Option<Application>>;

    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>>;

    async fn update_application(&self, application: &Application) -> Result<()>;

    async fn delete_application(&self, id: ApplicationId) -> Result<()>;
}
