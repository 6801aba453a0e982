use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::AvailabilityService;

pub fn availability_routes(service: Arc<AvailabilityService>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_availability).get(handlers::list_availability),
        )
        .route(
            "/{availability_id}",
            get(handlers::get_availability)
                .put(handlers::update_availability)
                .delete(handlers::delete_availability),
        )
        .with_state(service)
}
