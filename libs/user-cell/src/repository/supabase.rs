use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{User, UserRole};
use super::UserRepository;

const USERS_PATH: &str = "/rest/v1/users";

pub struct SupabaseUserRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseUserRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn select(&self, query: &str) -> Result<Vec<User>> {
        let path = format!("{}?{}", USERS_PATH, query);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        let users = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<User>, _>>()?;

        Ok(users)
    }
}

#[async_trait]
impl UserRepository for SupabaseUserRepository {
    async fn save(&self, user: &User) -> Result<User> {
        debug!("Inserting user {}", user.id);

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                USERS_PATH,
                Some(json!(user)),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create user"))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn update(&self, user: &User) -> Result<Option<User>> {
        let path = format!("{}?id=eq.{}", USERS_PATH, user.id);
        let update_data = json!({
            "first_name": user.first_name,
            "last_name": user.last_name,
            "updated_at": user.updated_at,
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(update_data),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        result
            .into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.select(&format!("id=eq.{}", id)).await?.into_iter().next())
    }

    async fn find_by_auth_id(&self, auth_external_id: &str) -> Result<Option<User>> {
        let query = format!(
            "auth_external_id=eq.{}",
            urlencoding::encode(auth_external_id)
        );
        Ok(self.select(&query).await?.into_iter().next())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.select("order=created_at.asc").await
    }

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.select(&format!("role=eq.{}&order=created_at.asc", role)).await
    }
}
