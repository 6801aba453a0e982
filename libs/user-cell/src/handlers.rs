use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreateUserRequest, UpdateUserRequest, UserError};
use crate::services::UserDirectoryService;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            UserError::Validation(msg) => AppError::ValidationError(msg),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn create_user(
    State(service): State<Arc<UserDirectoryService>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let user = service.create_user(request).await?;
    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn list_users(
    State(service): State<Arc<UserDirectoryService>>,
) -> Result<Json<Value>, AppError> {
    let users = service.find_all_users().await?;
    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn list_professionals(
    State(service): State<Arc<UserDirectoryService>>,
) -> Result<Json<Value>, AppError> {
    let users = service.find_professionals().await?;
    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(service): State<Arc<UserDirectoryService>>,
) -> Result<Json<Value>, AppError> {
    let users = service.find_patients().await?;
    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(service): State<Arc<UserDirectoryService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user = service
        .find_user_by_id(user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))?;
    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(service): State<Arc<UserDirectoryService>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let user = service.update_user(user_id, request).await?;
    Ok(Json(json!(user)))
}
