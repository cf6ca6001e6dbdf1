use super::{non_empty, require_text};
use crate::{
    entities::{User, UserId},
    error::{RegistryError, Result},
    page::{Page, PageRequest},
    password::hash_password,
    storage::UserStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Fields accepted by [`UserRegistry::update`]
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// Always written
    pub name: String,
    /// Written only when present and non-empty
    pub email: Option<String>,
    /// Re-hashed and written only when present and non-empty
    pub password: Option<String>,
}

/// Registry for user identity records
#[derive(Clone)]
pub struct UserRegistry {
    store: Arc<dyn UserStore>,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = require_text(name, "User name")?;
        let password_hash = hash_password(password)?;

        let user = self.store.insert_user(name, email, &password_hash).await?;
        info!("Created user {} ({})", user.id, user.name);
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        debug!("Getting user {}", id);
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| RegistryError::user_not_found(id))
    }

    /// First user with this name; names are not unique
    pub async fn get_by_name(&self, name: &str) -> Result<User> {
        let name = require_text(name, "User name")?;
        self.store
            .find_user_by_name(name)
            .await?
            .ok_or_else(|| RegistryError::UserNotFound(name.to_string()))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<User>> {
        self.store.list_users(page).await
    }

    pub async fn update(&self, id: UserId, update: UserUpdate) -> Result<User> {
        require_text(&update.name, "User name")?;
        let mut user = self.get(id).await?;

        user.name = update.name;
        if let Some(email) = non_empty(update.email) {
            user.email = email;
        }
        if let Some(password) = non_empty(update.password) {
            user.password_hash = hash_password(password)?;
        }

        self.store.update_user(&user).await?;
        info!("Updated user {}", user.id);
        Ok(user)
    }

    /// Remove a user. Projects it owns and team memberships are left as they are.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.store.delete_user(id).await?;
        info!("Deleted user {}", id);
        Ok(())
    }
}
