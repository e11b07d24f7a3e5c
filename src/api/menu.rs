//! Menu catalog endpoint.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use super::token_header;
use super::validation::validate_email;
use crate::models::Menu;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub email: String,
}

/// Fetch the menu catalog
///
/// GET /menu?email=...
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Menu>, ApiError> {
    if let Err(e) = validate_email(&query.email) {
        return Err(ApiError::validation_field("email", e));
    }

    let menu = state
        .menu
        .fetch(&token_header(&headers), &query.email)
        .await?;
    Ok(Json(menu))
}
