//! Login, token inspection, extension and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_required, validate_token_id};
use crate::models::Token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtendTokenRequest {
    pub id: String,
    /// Must be `true`; present so a PUT cannot extend by accident.
    #[serde(default)]
    pub extend: bool,
}

/// Log in and mint a fresh token
///
/// POST /tokens
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Token>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_required(&req.password, "Password") {
        errors.add("password", e);
    }
    errors.finish()?;

    let token = state.tokens.issue(&req.email, &req.password).await?;
    Ok(Json(token))
}

/// Fetch a token record by id
///
/// GET /tokens?id=...
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Token>, ApiError> {
    if let Err(e) = validate_token_id(&query.id) {
        return Err(ApiError::validation_field("id", e));
    }

    let token = state.tokens.fetch(&query.id).await?;
    Ok(Json(token))
}

/// Push an unexpired token's expiry an hour out
///
/// PUT /tokens
pub async fn extend_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtendTokenRequest>,
) -> Result<Json<Token>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_token_id(&req.id) {
        errors.add("id", e);
    }
    if !req.extend {
        errors.add("extend", "Must be true to extend the token");
    }
    errors.finish()?;

    let token = state.tokens.extend(&req.id).await?;
    Ok(Json(token))
}

/// Log out by revoking the token
///
/// DELETE /tokens?id=...
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_token_id(&query.id) {
        return Err(ApiError::validation_field("id", e));
    }

    state.tokens.revoke(&query.id).await?;
    Ok(StatusCode::OK)
}
