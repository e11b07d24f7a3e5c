//! Hashing and random identifier generation.
//!
//! Passwords are hashed with Argon2. Storage keys for user records are
//! derived deterministically from the email address with HMAC-SHA256 keyed
//! by the configured hashing secret, so the same email always maps to the
//! same record without storing the address in the file name.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Alphabet for generated identifiers (cart and token ids).
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Derive the storage key for a value, hex-encoded HMAC-SHA256.
pub fn storage_key(secret: &str, value: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(value.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generate a random identifier of `len` lowercase alphanumeric characters.
pub fn random_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("orange-crust-7").unwrap();
        assert_ne!(hash, "orange-crust-7");
        assert!(verify_password("orange-crust-7", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_storage_key_deterministic() {
        let a = storage_key("secret", "alice@example.com");
        let b = storage_key("secret", "alice@example.com");
        assert_eq!(a, b);
        // hex-encoded SHA-256 output
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_storage_key_varies_with_secret_and_input() {
        let base = storage_key("secret", "alice@example.com");
        assert_ne!(base, storage_key("other-secret", "alice@example.com"));
        assert_ne!(base, storage_key("secret", "bob@example.com"));
    }

    #[test]
    fn test_random_id_shape() {
        for len in [10, 20] {
            let id = random_id(len);
            assert_eq!(id.len(), len);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_random_id_varies() {
        let ids: Vec<String> = (0..8).map(|_| random_id(20)).collect();
        let first = &ids[0];
        assert!(ids.iter().any(|id| id != first));
    }
}
