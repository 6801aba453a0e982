pub mod handlers;
pub mod router;
pub mod models;
pub mod repository;
pub mod services;

pub use models::*;
pub use repository::{UserRepository, InMemoryUserRepository, SupabaseUserRepository};
pub use services::UserDirectoryService;
