//! Core data structures for the infra registry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a store-assigned integer identifier newtype
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a user
    UserId
);
entity_id!(
    /// Unique identifier for a project
    ProjectId
);
entity_id!(
    /// Unique identifier for an application team
    TeamId
);
entity_id!(
    /// Unique identifier for an application
    ApplicationId
);

/// A user known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Display name; not unique
    pub name: String,

    pub email: String,

    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// A project owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,

    /// Owning user; may dangle after the user is deleted
    pub owner_id: UserId,

    /// Name of the owning user, resolved by the store. `None` when the
    /// owner no longer exists.
    pub owner_name: Option<String>,
}

/// An application team with a flat member set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,

    /// Members in insertion order. Deleted users drop out of this list.
    pub members: Vec<User>,
}

impl Team {
    pub fn member_ids(&self) -> Vec<UserId> {
        self.members.iter().map(|m| m.id).collect()
    }
}

/// An application bound to one team and one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    pub description: Option<String>,
    pub team_id: TeamId,
    pub project_id: ProjectId,
}
