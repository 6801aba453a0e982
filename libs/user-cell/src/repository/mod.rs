use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{User, UserRole};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryUserRepository;
pub use supabase::SupabaseUserRepository;

/// Persistence port of the user directory.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<User>;

    /// Overwrites the stored record, returning `None` when the id is unknown.
    async fn update(&self, user: &User) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_auth_id(&self, auth_external_id: &str) -> Result<Option<User>>;

    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>>;
}
