//! Cart endpoints: create, fetch, apply deltas, delete.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::token_header;
use super::validation::{validate_cart_id, validate_email};
use crate::engine::CartUpdate;
use crate::models::{Cart, ItemDelta, ItemRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCartRequest {
    pub email: String,
    pub items: Vec<ItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub email: String,
    pub id: String,
    pub items: Vec<ItemDelta>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCartRequest {
    pub email: String,
    pub id: String,
}

/// Create a cart from requested item lines
///
/// POST /cart
pub async fn create_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if req.items.is_empty() {
        errors.add("items", "At least one item is required");
    }
    errors.finish()?;

    let cart = state
        .carts
        .create(&token_header(&headers), &req.email, &req.items)
        .await?;
    Ok(Json(cart))
}

/// Fetch a cart
///
/// GET /cart?email=...&id=...
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CartQuery>,
) -> Result<Json<Cart>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&query.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_cart_id(&query.id) {
        errors.add("id", e);
    }
    errors.finish()?;

    let cart = state
        .carts
        .fetch(&token_header(&headers), &query.email, &query.id)
        .await?;
    Ok(Json(cart))
}

/// Apply item deltas to a cart. Valid deltas commit even when others are
/// rejected; the rejected ones come back in `invalid_items`.
///
/// PUT /cart
pub async fn update_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateCartRequest>,
) -> Result<Json<CartUpdate>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_cart_id(&req.id) {
        errors.add("id", e);
    }
    if req.items.is_empty() {
        errors.add("items", "At least one item is required");
    }
    errors.finish()?;

    let update = state
        .carts
        .update(&token_header(&headers), &req.email, &req.id, &req.items)
        .await?;
    Ok(Json(update))
}

/// Delete a cart
///
/// DELETE /cart
pub async fn delete_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<DeleteCartRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_cart_id(&req.id) {
        errors.add("id", e);
    }
    errors.finish()?;

    state
        .carts
        .remove(&token_header(&headers), &req.email, &req.id)
        .await?;
    Ok(StatusCode::OK)
}
