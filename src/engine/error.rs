//! Failure classes for the ordering core.

use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Every expected failure of a core operation. Validation and authorization
/// failures happen before any mutation; upstream failures carry enough
/// context for callers to tell "nothing happened" apart from "payment was
/// captured but the confirmation never went out".
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing or invalid required fields")]
    Validation(Vec<String>),

    #[error("missing required token or token is invalid")]
    InvalidToken,

    #[error("cart does not belong to the user")]
    NotOwner,

    #[error("password did not match the stored password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("a user with that email already exists")]
    UserExists,

    #[error("could not find the specified cart")]
    CartNotFound,

    #[error("could not find the specified token")]
    TokenNotFound,

    #[error("the token has already expired and cannot be extended")]
    TokenExpired,

    #[error("invalid items in item list")]
    InvalidItems(Vec<Value>),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("payment failed: {0}")]
    Payment(String),

    #[error("payment captured but confirmation failed: {0}")]
    Notification(String),
}
