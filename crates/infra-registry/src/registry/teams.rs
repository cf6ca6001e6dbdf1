use super::{UserRegistry, require_text};
use crate::{
    entities::{Team, TeamId, User, UserId},
    error::{RegistryError, Result},
    page::{Page, PageRequest},
    storage::TeamStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Registry for application teams and their member sets
#[derive(Clone)]
pub struct TeamRegistry {
    store: Arc<dyn TeamStore>,
    users: UserRegistry,
}

impl TeamRegistry {
    pub fn new(store: Arc<dyn TeamStore>, users: UserRegistry) -> Self {
        Self { store, users }
    }

    /// Resolve every member id in order, stopping at the first unknown one.
    /// Repeated ids collapse into a single membership.
    async fn resolve_members(&self, member_ids: &[UserId]) -> Result<Vec<User>> {
        let mut members: Vec<User> = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            if members.iter().any(|m| m.id == *id) {
                continue;
            }
            members.push(self.users.get(*id).await?);
        }
        Ok(members)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        member_ids: &[UserId],
    ) -> Result<Team> {
        let name = require_text(name, "Team name")?;
        let members = self.resolve_members(member_ids).await?;
        let ids: Vec<UserId> = members.iter().map(|m| m.id).collect();

        let team = self
            .store
            .insert_team(name, description.as_deref(), &ids)
            .await?;
        info!(
            "Created team {} ({}) with {} member(s)",
            team.id,
            team.name,
            team.members.len()
        );
        Ok(team)
    }

    pub async fn get(&self, id: TeamId) -> Result<Team> {
        debug!("Getting team {}", id);
        self.store
            .find_team(id)
            .await?
            .ok_or_else(|| RegistryError::team_not_found(id))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Team>> {
        self.store.list_teams(page).await
    }

    /// Replace name, description and the whole member set
    pub async fn update(
        &self,
        id: TeamId,
        name: &str,
        description: Option<String>,
        member_ids: &[UserId],
    ) -> Result<Team> {
        let name = require_text(name, "Team name")?;
        let members = self.resolve_members(member_ids).await?;

        let mut team = self.get(id).await?;
        team.name = name.to_string();
        team.description = description;
        team.members = members;

        let team = self.store.update_team(&team).await?;
        info!(
            "Updated team {} with {} member(s)",
            team.id,
            team.members.len()
        );
        Ok(team)
    }

    /// Remove a team. Applications referencing it are not checked.
    pub async fn delete(&self, id: TeamId) -> Result<()> {
        self.store.delete_team(id).await?;
        info!("Deleted team {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registries, storage::MemoryStorage};

    fn registries() -> Registries {
        Registries::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_resolves_members_in_order() {
        let r = registries();
        let a = r.users.create("A", "a@example.com", "pw").await.unwrap();
        let b = r.users.create("B", "b@example.com", "pw").await.unwrap();

        let team = r
            .teams
            .create("Platform", Some("infra".into()), &[b.id, a.id, b.id])
            .await
            .unwrap();

        assert_eq!(team.member_ids(), vec![b.id, a.id]);
        assert_eq!(r.teams.get(team.id).await.unwrap(), team);
    }

    #[tokio::test]
    async fn test_create_fails_fast_on_unknown_member() {
        let r = registries();
        let a = r.users.create("A", "a@example.com", "pw").await.unwrap();

        let err = r
            .teams
            .create("Platform", None, &[a.id, UserId(404), UserId(405)])
            .await
            .unwrap_err();

        match err {
            RegistryError::UserNotFound(id) => assert_eq!(id, "404"),
            other => panic!("Expected UserNotFound, got {:?}", other),
        }
        assert_eq!(r.teams.list(PageRequest::default()).await.unwrap().total_elements, 0);
    }

    #[tokio::test]
    async fn test_update_with_empty_members_clears_membership() {
        let r = registries();
        let a = r.users.create("A", "a@example.com", "pw").await.unwrap();
        let team = r.teams.create("Platform", None, &[a.id]).await.unwrap();

        let updated = r
            .teams
            .update(team.id, "Platform", Some("now empty".into()), &[])
            .await
            .unwrap();

        assert!(updated.members.is_empty());
        assert_eq!(updated.description.as_deref(), Some("now empty"));
        assert!(r.teams.get(team.id).await.unwrap().members.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_rather_than_merges() {
        let r = registries();
        let a = r.users.create("A", "a@example.com", "pw").await.unwrap();
        let b = r.users.create("B", "b@example.com", "pw").await.unwrap();
        let team = r.teams.create("Platform", None, &[a.id]).await.unwrap();

        let updated = r.teams.update(team.id, "Platform", None, &[b.id]).await.unwrap();
        assert_eq!(updated.member_ids(), vec![b.id]);
    }

    #[tokio::test]
    async fn test_update_unknown_team_is_not_found() {
        let r = registries();

        let err = r.teams.update(TeamId(1), "x", None, &[]).await.unwrap_err();
        assert!(matches!(err, RegistryError::TeamNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_pages_fifteen_teams() {
        let r = registries();
        for i in 0..15 {
            r.teams.create(&format!("team-{}", i), None, &[]).await.unwrap();
        }

        let first = r.teams.list(PageRequest::new(0, 10).unwrap()).await.unwrap();
        assert_eq!(first.content.len(), 10);
        assert_eq!(first.content[0].name, "team-0");
        assert_eq!(first.total_elements, 15);

        let second = r.teams.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
        let names: Vec<_> = second.content.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["team-10", "team-11", "team-12", "team-13", "team-14"]);
    }
}
