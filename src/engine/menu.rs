//! Read-only access to the menu catalog singleton.

use std::sync::Arc;
use tracing::info;

use super::{CoreError, TokenGate};
use crate::models::Menu;
use crate::store::{self, Store, StoreError};

#[derive(Clone)]
pub struct MenuCatalog {
    store: Arc<dyn Store>,
    gate: TokenGate,
}

impl MenuCatalog {
    pub fn new(store: Arc<dyn Store>, gate: TokenGate) -> Self {
        Self { store, gate }
    }

    /// Load the catalog for internal pricing. A missing menu record is a
    /// storage fault, not a client error.
    pub(crate) async fn load(&self) -> Result<Menu, CoreError> {
        Ok(store::decode(
            self.store.read(store::MENU, store::MENU_RECORD).await?,
        )?)
    }

    /// Token-gated catalog read for the API surface.
    pub async fn fetch(&self, token: &str, email: &str) -> Result<Menu, CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }
        self.load().await
    }

    /// Create the default catalog on first startup. An existing record is
    /// left alone, it belongs to whoever administers the menu.
    pub async fn seed_default(store: &dyn Store) -> Result<(), StoreError> {
        match store.read(store::MENU, store::MENU_RECORD).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound) => {
                info!("Seeding default menu catalog");
                store
                    .create(
                        store::MENU,
                        store::MENU_RECORD,
                        store::encode(&Menu::default_catalog())?,
                    )
                    .await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::crypto;
    use crate::models::Token;
    use chrono::{Duration, Utc};

    fn test_store() -> Arc<dyn Store> {
        Arc::new(crate::store::MemoryStore::new())
    }

    fn catalog(store: &Arc<dyn Store>) -> MenuCatalog {
        let gate = TokenGate::new(&AuthConfig::default(), store.clone());
        MenuCatalog::new(store.clone(), gate)
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

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = test_store();
        MenuCatalog::seed_default(store.as_ref()).await.unwrap();
        MenuCatalog::seed_default(store.as_ref()).await.unwrap();

        let menu = catalog(&store).load().await.unwrap();
        assert_eq!(menu.unit_price("margherita", "large"), Some(12));
    }

    #[tokio::test]
    async fn test_seed_does_not_clobber_existing_catalog() {
        let store = test_store();
        let custom: Menu = serde_json::from_value(serde_json::json!({
            "pizzas": {
                "calzone": { "description": "Folded", "prices": { "one-size": 11 } }
            }
        }))
        .unwrap();
        store
            .create(store::MENU, store::MENU_RECORD, store::encode(&custom).unwrap())
            .await
            .unwrap();

        MenuCatalog::seed_default(store.as_ref()).await.unwrap();

        let menu = catalog(&store).load().await.unwrap();
        assert_eq!(menu.unit_price("calzone", "one-size"), Some(11));
        assert_eq!(menu.unit_price("margherita", "large"), None);
    }

    #[tokio::test]
    async fn test_fetch_requires_valid_token() {
        let store = test_store();
        MenuCatalog::seed_default(store.as_ref()).await.unwrap();
        let catalog = catalog(&store);

        let err = catalog.fetch("badtoken", "alice@x.com").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidToken));

        let token = seed_token(&store, "alice@x.com").await;
        let menu = catalog.fetch(&token, "alice@x.com").await.unwrap();
        assert!(menu.unit_price("pepperoni", "small").is_some());
    }
}
