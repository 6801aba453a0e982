use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::{appointment_routes, notification_routes};
use appointment_cell::{
    AppointmentRepository, AppointmentService, InMemoryAppointmentRepository,
    InMemoryNotificationRepository, NotificationRepository, NotificationService,
    SupabaseAppointmentRepository, SupabaseNotificationRepository,
};
use availability_cell::router::availability_routes;
use availability_cell::{
    AvailabilityRepository, AvailabilityService, InMemoryAvailabilityRepository,
    SupabaseAvailabilityRepository,
};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use user_cell::router::user_routes;
use user_cell::{InMemoryUserRepository, SupabaseUserRepository, UserDirectoryService, UserRepository};

/// Engines shared by every request.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserDirectoryService>,
    pub availability: Arc<AvailabilityService>,
    pub appointments: Arc<AppointmentService>,
    pub notifications: Arc<NotificationService>,
}

impl AppServices {
    /// Supabase-backed when configured, otherwise everything lives in memory.
    pub fn from_config(config: &AppConfig) -> Self {
        if config.is_configured() {
            let supabase = Arc::new(SupabaseClient::new(config));
            Self::wire(
                Arc::new(SupabaseUserRepository::new(supabase.clone())),
                Arc::new(SupabaseAvailabilityRepository::new(supabase.clone())),
                Arc::new(SupabaseAppointmentRepository::new(supabase.clone())),
                Arc::new(SupabaseNotificationRepository::new(supabase)),
            )
        } else {
            Self::in_memory()
        }
    }

    pub fn in_memory() -> Self {
        Self::wire(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryAvailabilityRepository::new()),
            Arc::new(InMemoryAppointmentRepository::new()),
            Arc::new(InMemoryNotificationRepository::new()),
        )
    }

    fn wire(
        users: Arc<dyn UserRepository>,
        availability: Arc<dyn AvailabilityRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        let users = Arc::new(UserDirectoryService::new(users));
        let availability = Arc::new(AvailabilityService::new(availability, users.clone()));
        let notifications = Arc::new(NotificationService::new(notifications));
        let appointments = Arc::new(AppointmentService::new(
            appointments,
            availability.clone(),
            users.clone(),
            notifications.clone(),
        ));

        Self {
            users,
            availability,
            appointments,
            notifications,
        }
    }
}

pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "CalenConnect API is running!" }))
        .nest("/users", user_routes(services.users))
        .nest("/availability", availability_routes(services.availability))
        .nest("/appointments", appointment_routes(services.appointments))
        .nest("/notifications", notification_routes(services.notifications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn liveness_route_answers() {
        let app = create_router(AppServices::in_memory());

        let (status, body) = call(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "CalenConnect API is running!");
    }

    #[tokio::test]
    async fn cells_are_nested_under_their_prefixes() {
        let app = create_router(AppServices::in_memory());

        let (status, body) = call(
            &app,
            "POST",
            "/users",
            Some(json!({
                "auth_external_id": "auth|router",
                "first_name": "Lia",
                "last_name": "Rocha",
                "role": "professional"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let user: Value = serde_json::from_slice(&body).unwrap();

        let uri = format!("/availability?professional_id={}", user["id"].as_str().unwrap());
        let (status, body) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));

        let (status, _) = call(&app, "GET", "/appointments", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, "GET", "/notifications", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unconfigured_settings_fall_back_to_memory() {
        let config = AppConfig::default();
        assert!(!config.is_configured());
        let _services = AppServices::from_config(&config);
    }
}
