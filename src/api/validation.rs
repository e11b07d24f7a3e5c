//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::{CART_ID_LEN, TOKEN_ID_LEN};

lazy_static! {
    /// Permissive local part, domain made of valid labels with a TLD
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).unwrap();

    /// Generated identifiers are lowercase alphanumeric only
    static ref ID_REGEX: Regex = Regex::new(r"^[a-z0-9]+$").unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a cart identifier
pub fn validate_cart_id(id: &str) -> Result<(), String> {
    validate_id(id, CART_ID_LEN, "Cart id")
}

/// Validate a token identifier
pub fn validate_token_id(id: &str) -> Result<(), String> {
    validate_id(id, TOKEN_ID_LEN, "Token id")
}

fn validate_id(id: &str, expected_len: usize, label: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{label} is required"));
    }

    if id.len() != expected_len || !ID_REGEX.is_match(id) {
        return Err(format!(
            "{label} must be exactly {expected_len} lowercase alphanumeric characters"
        ));
    }

    Ok(())
}

/// Validate a required free-text field (name, address, password)
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_common_addresses() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("alice.miller+pizza@mail.example.co").is_ok());
        assert!(validate_email("o'brien@sub.domain.org").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
        // a domain needs at least one dot-separated label
        assert!(validate_email("alice@localhost").is_err());
        assert!(validate_email("alice@-bad.com").is_err());
    }

    #[test]
    fn test_validate_cart_id() {
        assert!(validate_cart_id("a1b2c3d4e5").is_ok());

        assert!(validate_cart_id("").is_err());
        assert!(validate_cart_id("short").is_err());
        assert!(validate_cart_id("a1b2c3d4e5f6").is_err());
        assert!(validate_cart_id("A1B2C3D4E5").is_err());
        assert!(validate_cart_id("a1b2c3d4e!").is_err());
    }

    #[test]
    fn test_validate_token_id() {
        assert!(validate_token_id("abcdefghij0123456789").is_ok());

        assert!(validate_token_id("abcdefghij").is_err());
        assert!(validate_token_id("ABCDEFGHIJ0123456789").is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("1 Oven Street", "Address").is_ok());
        assert!(validate_required("", "Address").is_err());
        assert!(validate_required("   ", "Address").is_err());
    }
}
