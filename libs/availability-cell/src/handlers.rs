use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AvailabilityError, CreateAvailabilityRequest, UpdateAvailabilityRequest};
use crate::services::AvailabilityService;

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::NotFound(msg) => AppError::NotFound(msg),
            AvailabilityError::Validation(msg) => AppError::ValidationError(msg),
            AvailabilityError::Conflict(msg) => AppError::Conflict(msg),
            AvailabilityError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub professional_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[axum::debug_handler]
pub async fn create_availability(
    State(service): State<Arc<AvailabilityService>>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = service.create_availability(request).await?;
    Ok(Json(json!(slot)))
}

/// Slots of one professional; only the free ones of a day when `date` is given.
#[axum::debug_handler]
pub async fn list_availability(
    State(service): State<Arc<AvailabilityService>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let professional_id = query
        .professional_id
        .ok_or_else(|| AppError::BadRequest("professional_id is required".to_string()))?;

    let slots = match query.date {
        Some(date) => service.find_available_slots(professional_id, date).await?,
        None => service.find_by_professional_id(professional_id).await?,
    };
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(availability_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slot = service
        .find_availability_by_id(availability_id)
        .await?
        .ok_or_else(|| AvailabilityError::slot_not_found(availability_id))?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(availability_id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = service.update_availability(availability_id, request).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(availability_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slot = service.delete_availability(availability_id).await?;
    Ok(Json(json!({
        "message": "Availability deleted",
        "availability": slot
    })))
}
