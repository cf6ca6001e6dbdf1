//! In-memory storage implementation for testing and development

use super::{ApplicationStore, ProjectStore, TeamStore, UserStore};
use crate::{
    entities::*,
    error::Result,
    page::{Page, PageRequest},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ProjectRow {
    name: String,
    description: Option<String>,
    owner_id: UserId,
}

#[derive(Debug, Clone)]
struct TeamRow {
    name: String,
    description: Option<String>,
    member_ids: Vec<UserId>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, ProjectRow>,
    teams: BTreeMap<TeamId, TeamRow>,
    applications: BTreeMap<ApplicationId, Application>,
}

impl Tables {
    /// Ids are unique across tables, like a shared sequence
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn project(&self, id: ProjectId, row: &ProjectRow) -> Project {
        Project {
            id,
            name: row.name.clone(),
            description: row.description.clone(),
            owner_id: row.owner_id,
            owner_name: self.users.get(&row.owner_id).map(|u| u.name.clone()),
        }
    }

    fn team(&self, id: TeamId, row: &TeamRow) -> Team {
        Team {
            id,
            name: row.name.clone(),
            description: row.description.clone(),
            members: row
                .member_ids
                .iter()
                .filter_map(|member_id| self.users.get(member_id).cloned())
                .collect(),
        }
    }
}

/// In-memory storage implementing every store trait
///
/// Listing order is ascending id, matching the relational backends.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn insert_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables.write().await;
        let user = User {
            id: UserId(tables.next_id()),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.name == name).cloned())
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>> {
        let tables = self.tables.read().await;
        Ok(Page::from_ordered(
            tables.users.values().cloned().collect(),
            page,
        ))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.users.get_mut(&user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        self.tables.write().await.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStorage {
    async fn insert_project(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: UserId,
    ) -> Result<Project> {
        let mut tables = self.tables.write().await;
        let id = ProjectId(tables.next_id());
        let row = ProjectRow {
            name: name.to_string(),
            description: description.map(str::to_string),
            owner_id,
        };
        let project = tables.project(id, &row);
        tables.projects.insert(id, row);
        Ok(project)
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.get(&id).map(|row| tables.project(id, row)))
    }

    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|(_, row)| row.name == name)
            .map(|(id, row)| tables.project(*id, row)))
    }

    async fn list_projects(&self, page: PageRequest) -> Result<Page<Project>> {
        let tables = self.tables.read().await;
        let projects = tables
            .projects
            .iter()
            .map(|(id, row)| tables.project(*id, row))
            .collect();
        Ok(Page::from_ordered(projects, page))
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        let mut tables = self.tables.write().await;
        let row = ProjectRow {
            name: project.name.clone(),
            description: project.description.clone(),
            owner_id: project.owner_id,
        };
        let updated = tables.project(project.id, &row);
        if let Some(existing) = tables.projects.get_mut(&project.id) {
            *existing = row;
        }
        Ok(updated)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.tables.write().await.projects.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TeamStore for MemoryStorage {
    async fn insert_team(
        &self,
        name: &str,
        description: Option<&str>,
        member_ids: &[UserId],
    ) -> Result<Team> {
        let mut tables = self.tables.write().await;
        let id = TeamId(tables.next_id());
        let row = TeamRow {
            name: name.to_string(),
            description: description.map(str::to_string),
            member_ids: member_ids.to_vec(),
        };
        let team = tables.team(id, &row);
        tables.teams.insert(id, row);
        Ok(team)
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.get(&id).map(|row| tables.team(id, row)))
    }

    async fn list_teams(&self, page: PageRequest) -> Result<Page<Team>> {
        let tables = self.tables.read().await;
        let teams = tables
            .teams
            .iter()
            .map(|(id, row)| tables.team(*id, row))
            .collect();
        Ok(Page::from_ordered(teams, page))
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        let mut tables = self.tables.write().await;
        let row = TeamRow {
            name: team.name.clone(),
            description: team.description.clone(),
            member_ids: team.member_ids(),
        };
        let updated = tables.team(team.id, &row);
        if let Some(existing) = tables.teams.get_mut(&team.id) {
            *existing = row;
        }
        Ok(updated)
    }

    async fn delete_team(&self, id: TeamId) -> Result<()> {
        self.tables.write().await.teams.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStorage {
    async fn insert_application(
        &self,
        name: &str,
        description: Option<&str>,
        team_id: TeamId,
        project_id: ProjectId,
    ) -> Result<Application> {
        let mut tables = self.tables.write().await;
        let application = Application {
            id: ApplicationId(tables.next_id()),
            name: name.to_string(),
            description: description.map(str::to_string),
            team_id,
            project_id,
        };
        tables
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: ApplicationId) -> Result<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>> {
        let tables = self.tables.read().await;
        Ok(Page::from_ordered(
            tables.applications.values().cloned().collect(),
            page,
        ))
    }

    async fn update_application(&self, application: &Application) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.applications.get_mut(&application.id) {
            *existing = application.clone();
        }
        Ok(())
    }

    async fn delete_application(&self, id: ApplicationId) -> Result<()> {
        self.tables.write().await.applications.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_user_roundtrip() {
        let storage = MemoryStorage::new();

        let alice = storage.insert_user("Alice", "alice@example.com", "hash").await.unwrap();
        let found = storage.find_user(alice.id).await.unwrap();
        assert_eq!(found, Some(alice.clone()));

        storage.delete_user(alice.id).await.unwrap();
        assert!(storage.find_user(alice.id).await.unwrap().is_none());

        // Deleting again is a no-op
        storage.delete_user(alice.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_storage_find_by_name_returns_first_match() {
        let storage = MemoryStorage::new();

        let first = storage.insert_user("Sam", "sam1@example.com", "h").await.unwrap();
        storage.insert_user("Sam", "sam2@example.com", "h").await.unwrap();

        let found = storage.find_user_by_name("Sam").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(storage.find_user_by_name("Nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_project_owner_name_dangles() {
        let storage = MemoryStorage::new();

        let owner = storage.insert_user("Alice", "alice@example.com", "h").await.unwrap();
        let project = storage.insert_project("P1", None, owner.id).await.unwrap();
        assert_eq!(project.owner_name.as_deref(), Some("Alice"));

        storage.delete_user(owner.id).await.unwrap();

        let project = storage.find_project(project.id).await.unwrap().unwrap();
        assert_eq!(project.owner_id, owner.id);
        assert!(project.owner_name.is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_team_members_skip_deleted_users() {
        let storage = MemoryStorage::new();

        let a = storage.insert_user("A", "a@example.com", "h").await.unwrap();
        let b = storage.insert_user("B", "b@example.com", "h").await.unwrap();
        let team = storage.insert_team("Core", None, &[a.id, b.id]).await.unwrap();
        assert_eq!(team.members.len(), 2);

        storage.delete_user(a.id).await.unwrap();

        let team = storage.find_team(team.id).await.unwrap().unwrap();
        assert_eq!(team.member_ids(), vec![b.id]);
    }
}
