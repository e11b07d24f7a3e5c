//! Order placement endpoint.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::token_header;
use super::validation::{validate_cart_id, validate_email};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub email: String,
    pub cart_id: String,
}

/// Charge a cart and send the confirmation email
///
/// POST /order
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_cart_id(&req.cart_id) {
        errors.add("cart_id", e);
    }
    errors.finish()?;

    state
        .orders
        .place(&token_header(&headers), &req.email, &req.cart_id)
        .await?;
    Ok(StatusCode::OK)
}
