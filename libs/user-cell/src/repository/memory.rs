use std::collections::HashMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{User, UserRole};
use super::UserRepository;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    users
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;

        // Mirrors the unique index on auth_external_id.
        if users.values().any(|u| u.auth_external_id == user.auth_external_id) {
            return Err(anyhow!("duplicate auth_external_id {}", user.auth_external_id));
        }

        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_auth_id(&self, auth_external_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.auth_external_id == auth_external_id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(sorted(self.users.read().await.values().cloned().collect()))
    }

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        Ok(sorted(
            self.users
                .read()
                .await
                .values()
                .filter(|u| u.role == role)
                .cloned()
                .collect(),
        ))
    }
}
