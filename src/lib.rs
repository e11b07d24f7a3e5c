pub mod api;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod models;
pub mod notifications;
pub mod payments;
pub mod store;

use std::sync::Arc;

use config::Config;
use engine::{CartEngine, MenuCatalog, OrderEngine, TokenGate, UserEngine};
use notifications::Notifier;
use payments::PaymentGateway;
use store::Store;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub tokens: TokenGate,
    pub users: UserEngine,
    pub menu: MenuCatalog,
    pub carts: CartEngine,
    pub orders: OrderEngine,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tokens = TokenGate::new(&config.auth, store.clone());
        let users = UserEngine::new(&config.auth, store.clone(), tokens.clone());
        let menu = MenuCatalog::new(store.clone(), tokens.clone());
        let carts = CartEngine::new(store.clone(), tokens.clone(), menu.clone());
        let orders = OrderEngine::new(
            &config.auth,
            store.clone(),
            tokens.clone(),
            payments,
            notifier,
        );
        Self {
            config,
            store,
            tokens,
            users,
            menu,
            carts,
            orders,
        }
    }
}
