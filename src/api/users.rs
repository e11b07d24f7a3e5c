//! User signup and profile endpoints.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::token_header;
use super::validation::{validate_email, validate_required};
use crate::models::{NewUser, UserProfile, UserUpdate};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

/// Sign up a new user
///
/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_required(&req.first_name, "First name") {
        errors.add("first_name", e);
    }
    if let Err(e) = validate_required(&req.last_name, "Last name") {
        errors.add("last_name", e);
    }
    if let Err(e) = validate_required(&req.address, "Address") {
        errors.add("address", e);
    }
    if let Err(e) = validate_required(&req.password, "Password") {
        errors.add("password", e);
    }
    errors.finish()?;

    state
        .users
        .create(NewUser {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            address: req.address,
            password: req.password,
        })
        .await?;

    Ok(StatusCode::OK)
}

/// Fetch the caller's profile
///
/// GET /users?email=...
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserProfile>, ApiError> {
    if let Err(e) = validate_email(&query.email) {
        return Err(ApiError::validation_field("email", e));
    }

    let profile = state
        .users
        .fetch(&token_header(&headers), &query.email)
        .await?;
    Ok(Json(profile))
}

/// Update profile fields
///
/// PUT /users
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_email(&req.email) {
        return Err(ApiError::validation_field("email", e));
    }

    state
        .users
        .update(
            &token_header(&headers),
            &req.email,
            UserUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                address: req.address,
                password: req.password,
            },
        )
        .await?;

    Ok(StatusCode::OK)
}

/// Delete the caller's account
///
/// DELETE /users
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_email(&req.email) {
        return Err(ApiError::validation_field("email", e));
    }

    state
        .users
        .remove(&token_header(&headers), &req.email)
        .await?;
    Ok(StatusCode::OK)
}
