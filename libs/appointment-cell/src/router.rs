use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::services::{AppointmentService, NotificationService};

pub fn appointment_routes(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_appointment).get(handlers::search_appointments),
        )
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/{appointment_id}/complete", put(handlers::complete_appointment))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .route("/{appointment_id}/reschedule", put(handlers::reschedule_appointment))
        .route("/{appointment_id}/no-show", put(handlers::mark_as_no_show))
        .route("/{appointment_id}/reminder", post(handlers::send_reminder))
        .with_state(service)
}

pub fn notification_routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .with_state(service)
}
