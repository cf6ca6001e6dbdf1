//! Application team request and response models

use super::{UserResponse, api::require_text};
use crate::error::Result;
use infra_registry::{Team, UserId};
use serde::{Deserialize, Serialize};

/// Request to create a team or replace one wholesale
#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default, alias = "memberIds")]
    pub member_ids: Vec<i64>,
}

impl TeamRequest {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")
    }

    pub fn member_ids(&self) -> Vec<UserId> {
        self.member_ids.iter().copied().map(UserId).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<UserResponse>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id.0,
            name: team.name,
            description: team.description,
            members: team.members.into_iter().map(UserResponse::from).collect(),
        }
    }
}
