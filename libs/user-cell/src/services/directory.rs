use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserError, UserRole};
use crate::repository::UserRepository;

/// Registry of patients, professionals and admins. Other cells only consult it
/// for existence and role checks.
pub struct UserDirectoryService {
    repository: Arc<dyn UserRepository>,
}

impl UserDirectoryService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a user; one record per external auth identity
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserError> {
        debug!("Registering user for auth id {}", request.auth_external_id);

        let auth_external_id = require_field("auth_external_id", &request.auth_external_id)?;
        let first_name = require_field("first_name", &request.first_name)?;
        let last_name = require_field("last_name", &request.last_name)?;

        if self.repository.find_by_auth_id(&auth_external_id).await?.is_some() {
            warn!("Duplicate registration attempt for auth id {}", auth_external_id);
            return Err(UserError::AlreadyExists(auth_external_id));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            auth_external_id,
            first_name,
            last_name,
            role: request.role,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.save(&user).await?;
        info!("User {} registered as {}", user.id, user.role);
        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, UserError> {
        debug!("Updating user: {}", id);

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(first_name) = request.first_name {
            user.first_name = require_field("first_name", &first_name)?;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = require_field("last_name", &last_name)?;
        }
        user.updated_at = Utc::now();

        self.repository
            .update(&user)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_user_by_auth_id(&self, auth_external_id: &str) -> Result<Option<User>, UserError> {
        Ok(self.repository.find_by_auth_id(auth_external_id).await?)
    }

    pub async fn find_all_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn find_professionals(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repository.find_by_role(UserRole::Professional).await?)
    }

    pub async fn find_patients(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repository.find_by_role(UserRole::Patient).await?)
    }
}

fn require_field(name: &str, value: &str) -> Result<String, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::Validation(format!("{} is required", name)));
    }
    Ok(trimmed.to_string())
}
