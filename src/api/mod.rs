mod cart;
mod error;
mod menu;
mod order;
mod tokens;
mod users;
mod validation;

pub use error::{ApiError, ErrorCode};

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route(
            "/users",
            post(users::create_user)
                .get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/tokens",
            post(tokens::login)
                .get(tokens::get_token)
                .put(tokens::extend_token)
                .delete(tokens::logout),
        )
        .route("/menu", get(menu::get_menu))
        .route(
            "/cart",
            post(cart::create_cart)
                .get(cart::get_cart)
                .put(cart::update_cart)
                .delete(cart::delete_cart),
        )
        .route("/order", post(order::place_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> StatusCode {
    StatusCode::OK
}

/// The auth token travels in a `token` header. A missing header becomes an
/// empty string, which the gate rejects.
pub(crate) fn token_header(headers: &HeaderMap) -> String {
    headers
        .get("token")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
