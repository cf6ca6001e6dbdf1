//! Registries owning the create/read/update/delete operations per entity
//!
//! Registries are cheap to clone and are built once at startup with
//! [`Registries::new`]. Cross-entity references are resolved by calling the
//! owning registry directly: projects resolve owners through [`UserRegistry`],
//! teams resolve members through [`UserRegistry`], and applications resolve
//! their team and project through [`TeamRegistry`] and [`ProjectRegistry`].

mod applications;
mod projects;
mod teams;
mod users;

pub use applications::{ApplicationRegistry, ApplicationUpdate};
pub use projects::{ProjectRegistry, ProjectUpdate};
pub use teams::TeamRegistry;
pub use users::{UserRegistry, UserUpdate};

use crate::{
    error::{RegistryError, Result},
    storage::{ApplicationStore, ProjectStore, TeamStore, UserStore},
};
use std::sync::Arc;

/// All four registries wired to one storage backend
#[derive(Clone)]
pub struct Registries {
    pub users: UserRegistry,
    pub projects: ProjectRegistry,
    pub teams: TeamRegistry,
    pub applications: ApplicationRegistry,
}

impl Registries {
    pub fn new<S>(storage: Arc<S>) -> Self
    where
        S: UserStore + ProjectStore + TeamStore + ApplicationStore + 'static,
    {
        let users = UserRegistry::new(storage.clone());
        let projects = ProjectRegistry::new(storage.clone(), users.clone());
        let teams = TeamRegistry::new(storage.clone(), users.clone());
        let applications = ApplicationRegistry::new(storage, teams.clone(), projects.clone());

        Self {
            users,
            projects,
            teams,
            applications,
        }
    }
}

/// Reject a blank required text field
pub(crate) fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(RegistryError::invalid_argument(format!(
            "{} cannot be blank",
            field
        )));
    }
    Ok(value)
}

/// Unwrap a required optional value
pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| RegistryError::invalid_argument(format!("{} cannot be null", field)))
}

/// Treat an empty string the same as an absent one
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
