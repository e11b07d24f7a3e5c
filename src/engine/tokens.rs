//! Token issuance, renewal, revocation and the authorization gate.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use super::CoreError;
use crate::config::AuthConfig;
use crate::crypto;
use crate::models::{Token, User};
use crate::store::{self, Store, StoreError};

/// Token ids are 20 random lowercase alphanumeric characters.
pub const TOKEN_ID_LEN: usize = 20;

/// Tokens live for one hour from issue or extension.
const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Clone)]
pub struct TokenGate {
    store: Arc<dyn Store>,
    hashing_secret: String,
}

impl TokenGate {
    pub fn new(auth: &AuthConfig, store: Arc<dyn Store>) -> Self {
        Self {
            store,
            hashing_secret: auth.hashing_secret.clone(),
        }
    }

    /// True iff `token_id` names a stored token owned by `email` that has
    /// not expired. Read-only and infallible: lookup failures, ownership
    /// mismatches and expiry all answer `false`.
    pub async fn verify(&self, token_id: &str, email: &str) -> bool {
        if token_id.is_empty() {
            return false;
        }
        match self.store.read(store::TOKENS, token_id).await {
            Ok(record) => match store::decode::<Token>(record) {
                Ok(token) => token.email == email && !token.is_expired(),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    /// Log a user in: check the password against the stored user and mint a
    /// fresh token expiring in an hour.
    pub async fn issue(&self, email: &str, password: &str) -> Result<Token, CoreError> {
        let key = crypto::storage_key(&self.hashing_secret, email);
        let user: User = match self.store.read(store::USERS, &key).await {
            Ok(record) => store::decode(record)?,
            Err(StoreError::NotFound) => return Err(CoreError::UserNotFound),
            Err(e) => return Err(e.into()),
        };

        if !crypto::verify_password(password, &user.password_hash) {
            return Err(CoreError::InvalidCredentials);
        }

        let token = Token {
            id: crypto::random_id(TOKEN_ID_LEN),
            email: email.to_string(),
            expires: Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
        };
        self.store
            .create(store::TOKENS, &token.id, store::encode(&token)?)
            .await?;

        info!(email = %email, "Issued auth token");
        Ok(token)
    }

    pub async fn fetch(&self, token_id: &str) -> Result<Token, CoreError> {
        match self.store.read(store::TOKENS, token_id).await {
            Ok(record) => Ok(store::decode(record)?),
            Err(StoreError::NotFound) => Err(CoreError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Push the expiry an hour out. Expired tokens are never revivable.
    pub async fn extend(&self, token_id: &str) -> Result<Token, CoreError> {
        let mut token = self.fetch(token_id).await?;
        if token.is_expired() {
            return Err(CoreError::TokenExpired);
        }

        token.expires = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
        self.store
            .update(store::TOKENS, token_id, store::encode(&token)?)
            .await?;
        Ok(token)
    }

    /// Log out by deleting the token. An absent token reports not-found.
    pub async fn revoke(&self, token_id: &str) -> Result<(), CoreError> {
        self.fetch(token_id).await?;
        match self.store.delete(store::TOKENS, token_id).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(CoreError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Arc<dyn Store> {
        Arc::new(crate::store::MemoryStore::new())
    }

    fn gate(store: &Arc<dyn Store>) -> TokenGate {
        TokenGate::new(&AuthConfig::default(), store.clone())
    }

    async fn seed_user(store: &Arc<dyn Store>, email: &str, password: &str) {
        let auth = AuthConfig::default();
        let user = User {
            email: email.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Miller".to_string(),
            address: "1 Oven Street".to_string(),
            password_hash: crypto::hash_password(password).unwrap(),
        };
        let key = crypto::storage_key(&auth.hashing_secret, email);
        store
            .create(store::USERS, &key, store::encode(&user).unwrap())
            .await
            .unwrap();
    }

    async fn seed_token(store: &Arc<dyn Store>, email: &str, expires_in: Duration) -> String {
        let token = Token {
            id: crypto::random_id(TOKEN_ID_LEN),
            email: email.to_string(),
            expires: Utc::now() + expires_in,
        };
        store
            .create(store::TOKENS, &token.id, store::encode(&token).unwrap())
            .await
            .unwrap();
        token.id
    }

    #[tokio::test]
    async fn test_issue_creates_token_with_one_hour_expiry() {
        let store = test_store();
        seed_user(&store, "alice@x.com", "open-sesame").await;

        let token = gate(&store).issue("alice@x.com", "open-sesame").await.unwrap();
        assert_eq!(token.id.len(), TOKEN_ID_LEN);
        assert_eq!(token.email, "alice@x.com");
        assert!(token.expires > Utc::now() + Duration::minutes(59));
        assert!(token.expires <= Utc::now() + Duration::minutes(61));

        // the token is persisted under its own id
        assert!(store.read(store::TOKENS, &token.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_issue_rejects_wrong_password() {
        let store = test_store();
        seed_user(&store, "alice@x.com", "open-sesame").await;

        let err = gate(&store).issue("alice@x.com", "guess").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_issue_rejects_unknown_user() {
        let store = test_store();
        let err = gate(&store).issue("ghost@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound));
    }

    #[tokio::test]
    async fn test_verify_matches_owner_and_expiry() {
        let store = test_store();
        let id = seed_token(&store, "alice@x.com", Duration::hours(1)).await;
        let gate = gate(&store);

        assert!(gate.verify(&id, "alice@x.com").await);
        assert!(!gate.verify(&id, "bob@x.com").await);
        assert!(!gate.verify("nosuchtokenid0000000a", "alice@x.com").await);
        assert!(!gate.verify("", "alice@x.com").await);
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let store = test_store();
        let id = seed_token(&store, "alice@x.com", Duration::seconds(-1)).await;

        assert!(!gate(&store).verify(&id, "alice@x.com").await);
    }

    #[tokio::test]
    async fn test_extend_resets_expiry() {
        let store = test_store();
        let id = seed_token(&store, "alice@x.com", Duration::minutes(5)).await;

        let token = gate(&store).extend(&id).await.unwrap();
        assert!(token.expires > Utc::now() + Duration::minutes(59));
    }

    #[tokio::test]
    async fn test_extend_never_revives_expired_token() {
        let store = test_store();
        let id = seed_token(&store, "alice@x.com", Duration::seconds(-1)).await;
        let gate = gate(&store);

        let err = gate.extend(&id).await.unwrap_err();
        assert!(matches!(err, CoreError::TokenExpired));

        // still expired in the store
        let stored = gate.fetch(&id).await.unwrap();
        assert!(stored.is_expired());
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = test_store();
        let id = seed_token(&store, "alice@x.com", Duration::hours(1)).await;
        let gate = gate(&store);

        gate.revoke(&id).await.unwrap();
        assert!(matches!(
            gate.fetch(&id).await.unwrap_err(),
            CoreError::TokenNotFound
        ));
        assert!(matches!(
            gate.revoke(&id).await.unwrap_err(),
            CoreError::TokenNotFound
        ));
    }
}
