//! User signup and token-gated profile management.

use std::sync::Arc;
use tracing::info;

use super::{CoreError, TokenGate};
use crate::config::AuthConfig;
use crate::crypto;
use crate::models::{NewUser, User, UserProfile, UserUpdate};
use crate::store::{self, Store, StoreError};

#[derive(Clone)]
pub struct UserEngine {
    store: Arc<dyn Store>,
    gate: TokenGate,
    hashing_secret: String,
}

impl UserEngine {
    pub fn new(auth: &AuthConfig, store: Arc<dyn Store>, gate: TokenGate) -> Self {
        Self {
            store,
            gate,
            hashing_secret: auth.hashing_secret.clone(),
        }
    }

    fn key(&self, email: &str) -> String {
        crypto::storage_key(&self.hashing_secret, email)
    }

    /// Sign up a new user. Not token-gated; duplicate emails conflict.
    pub async fn create(&self, new_user: NewUser) -> Result<(), CoreError> {
        let key = self.key(&new_user.email);
        match self.store.read(store::USERS, &key).await {
            Ok(_) => return Err(CoreError::UserExists),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = crypto::hash_password(&new_user.password)
            .map_err(|e| CoreError::Storage(StoreError::Io(e.to_string())))?;
        let user = User {
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            address: new_user.address,
            password_hash,
        };
        self.store
            .create(store::USERS, &key, store::encode(&user)?)
            .await?;

        info!(email = %user.email, "Created user");
        Ok(())
    }

    pub async fn fetch(&self, token: &str, email: &str) -> Result<UserProfile, CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }
        let user = self.load(email).await?;
        Ok(user.into())
    }

    /// Apply the provided profile fields; a new password is re-hashed.
    pub async fn update(
        &self,
        token: &str,
        email: &str,
        update: UserUpdate,
    ) -> Result<(), CoreError> {
        if update.is_empty() {
            return Err(CoreError::Validation(vec!["fields to update".to_string()]));
        }
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }

        let mut user = self.load(email).await?;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        if let Some(password) = update.password {
            user.password_hash = crypto::hash_password(&password)
                .map_err(|e| CoreError::Storage(StoreError::Io(e.to_string())))?;
        }

        self.store
            .update(store::USERS, &self.key(email), store::encode(&user)?)
            .await?;

        info!(email = %email, "Updated user");
        Ok(())
    }

    pub async fn remove(&self, token: &str, email: &str) -> Result<(), CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }
        self.load(email).await?;

        // TODO: also delete the user's carts and tokens instead of
        // leaving them orphaned
        match self.store.delete(store::USERS, &self.key(email)).await {
            Ok(()) => {
                info!(email = %email, "Deleted user");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(CoreError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, email: &str) -> Result<User, CoreError> {
        match self.store.read(store::USERS, &self.key(email)).await {
            Ok(record) => Ok(store::decode(record)?),
            Err(StoreError::NotFound) => Err(CoreError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Token;
    use chrono::{Duration, Utc};

    fn test_store() -> Arc<dyn Store> {
        Arc::new(crate::store::MemoryStore::new())
    }

    fn engine(store: &Arc<dyn Store>) -> UserEngine {
        let auth = AuthConfig::default();
        let gate = TokenGate::new(&auth, store.clone());
        UserEngine::new(&auth, store.clone(), gate)
    }

    async fn seed_token(store: &Arc<dyn Store>, email: &str) -> String {
        let token = Token {
            id: crypto::random_id(20),
            email: email.to_string(),
            expires: Utc::now() + Duration::hours(1),
        };
        store
            .create(store::TOKENS, &token.id, store::encode(&token).unwrap())
            .await
            .unwrap();
        token.id
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Miller".to_string(),
            address: "1 Oven Street".to_string(),
            password: "open-sesame".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_hides_password_hash() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();

        let token = seed_token(&store, "alice@x.com").await;
        let profile = engine.fetch(&token, "alice@x.com").await.unwrap();
        assert_eq!(profile.email, "alice@x.com");
        assert_eq!(profile.first_name, "Alice");

        let raw = serde_json::to_value(&profile).unwrap();
        assert!(raw.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();

        let err = engine.create(new_user("alice@x.com")).await.unwrap_err();
        assert!(matches!(err, CoreError::UserExists));
    }

    #[tokio::test]
    async fn test_fetch_requires_valid_token() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();

        let err = engine.fetch("nottheirs", "alice@x.com").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidToken));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();
        let token = seed_token(&store, "alice@x.com").await;

        engine
            .update(
                &token,
                "alice@x.com",
                UserUpdate {
                    address: Some("2 Crust Lane".to_string()),
                    password: Some("new-password".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        let profile = engine.fetch(&token, "alice@x.com").await.unwrap();
        assert_eq!(profile.address, "2 Crust Lane");

        // the new password is what logs in now
        let gate = TokenGate::new(&AuthConfig::default(), store.clone());
        assert!(gate.issue("alice@x.com", "new-password").await.is_ok());
        assert!(matches!(
            gate.issue("alice@x.com", "open-sesame").await.unwrap_err(),
            CoreError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_update_requires_some_field() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();
        let token = seed_token(&store, "alice@x.com").await;

        let err = engine
            .update(&token, "alice@x.com", UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = test_store();
        let engine = engine(&store);
        engine.create(new_user("alice@x.com")).await.unwrap();
        let token = seed_token(&store, "alice@x.com").await;

        engine.remove(&token, "alice@x.com").await.unwrap();
        assert!(matches!(
            engine.fetch(&token, "alice@x.com").await.unwrap_err(),
            CoreError::UserNotFound
        ));
    }
}
