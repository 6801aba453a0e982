use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentError, AppointmentSearchQuery, CreateAppointmentRequest, NotificationQuery,
    RescheduleAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::{AppointmentService, NotificationService};

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::InvalidStatus(msg) => AppError::InvalidStatus(msg),
            AppointmentError::Availability(inner) => inner.into(),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentService>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.create_appointment(request).await?;
    Ok(Json(json!(appointment)))
}

/// Only the first filter present is applied: patient, then professional, then status.
#[axum::debug_handler]
pub async fn search_appointments(
    State(service): State<Arc<AppointmentService>>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = if let Some(patient_id) = query.patient_id {
        service.find_by_patient_id(patient_id).await?
    } else if let Some(professional_id) = query.professional_id {
        service.find_by_professional_id(professional_id).await?
    } else if let Some(status) = query.status {
        service.find_by_status(status).await?
    } else {
        Vec::new()
    };

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service
        .find_by_id(appointment_id)
        .await?
        .ok_or(AppointmentError::NotFound(appointment_id))?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.update_appointment(appointment_id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.complete_appointment(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.cancel_appointment(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service
        .reschedule_appointment(appointment_id, request.new_date)
        .await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn mark_as_no_show(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.mark_as_no_show(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn send_reminder(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let notifications = service.send_reminder(appointment_id).await?;
    Ok(Json(json!({
        "message": "Reminder sent",
        "notifications": notifications
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.delete_appointment(appointment_id).await?;
    Ok(Json(json!({
        "message": "Appointment deleted",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Value>, AppError> {
    let user_id = query
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;

    let notifications = service.find_by_user_id(user_id).await?;
    Ok(Json(json!(notifications)))
}
