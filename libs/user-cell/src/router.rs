use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::UserDirectoryService;

pub fn user_routes(service: Arc<UserDirectoryService>) -> Router {
    Router::new()
        .route("/", post(handlers::create_user).get(handlers::list_users))
        .route("/professionals", get(handlers::list_professionals))
        .route("/patients", get(handlers::list_patients))
        .route("/{user_id}", get(handlers::get_user).put(handlers::update_user))
        .with_state(service)
}
