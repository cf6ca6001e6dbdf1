//! User request and response models

use super::api::require_text;
use crate::error::{ApiError, Result};
use infra_registry::{User, UserUpdate};
use serde::{Deserialize, Serialize};

fn check_email(email: &str) -> Result<()> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(ApiError::Validation(format!(
            "email is not a valid address: {}",
            email
        )));
    }
    Ok(())
}

/// Request to create a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")?;
        check_email(&self.email)?;
        require_text(&self.password, "password")
    }
}

/// Request to update a user; empty or missing email and password are kept
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")?;
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => check_email(email),
            _ => Ok(()),
        }
    }
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Public view of a user; never carries the password
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            name: user.name,
            email: user.email,
        }
    }
}
