//! Order placement: charge the cart total, then notify the owner.
//!
//! The two outbound effects are sequential and their failures are distinct:
//! a declined charge aborts before any notification is attempted, while a
//! failed confirmation after a successful charge is surfaced as its own
//! error class rather than rolled back or swallowed. No order record is
//! persisted and the cart is left in place.

use std::sync::Arc;
use tracing::{info, warn};

use super::{CoreError, TokenGate};
use crate::config::AuthConfig;
use crate::crypto;
use crate::models::{Cart, User};
use crate::notifications::Notifier;
use crate::payments::PaymentGateway;
use crate::store::{self, Store, StoreError};

#[derive(Clone)]
pub struct OrderEngine {
    store: Arc<dyn Store>,
    gate: TokenGate,
    payments: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    hashing_secret: String,
}

impl OrderEngine {
    pub fn new(
        auth: &AuthConfig,
        store: Arc<dyn Store>,
        gate: TokenGate,
        payments: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            gate,
            payments,
            notifier,
            hashing_secret: auth.hashing_secret.clone(),
        }
    }

    /// Turn a cart into a paid, notified order.
    pub async fn place(&self, token: &str, email: &str, cart_id: &str) -> Result<(), CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }

        let cart: Cart = match self.store.read(store::CART, cart_id).await {
            Ok(record) => store::decode(record)?,
            Err(StoreError::NotFound) => return Err(CoreError::CartNotFound),
            Err(e) => return Err(e.into()),
        };
        if cart.email != email {
            return Err(CoreError::NotOwner);
        }

        // the account may have been deleted since the cart was created
        let key = crypto::storage_key(&self.hashing_secret, email);
        let user: User = match self.store.read(store::USERS, &key).await {
            Ok(record) => store::decode(record)?,
            Err(StoreError::NotFound) => return Err(CoreError::UserNotFound),
            Err(e) => return Err(e.into()),
        };

        self.payments
            .charge(cart.total)
            .await
            .map_err(|e| CoreError::Payment(e.to_string()))?;

        info!(cart = %cart.id, total = cart.total, "Payment captured");

        let subject = format!("Order {} ready", cart.id);
        if let Err(e) = self
            .notifier
            .send(&user.full_name(), email, &subject, "Your order is ready.")
            .await
        {
            warn!(cart = %cart.id, error = %e, "Order paid but confirmation failed");
            return Err(CoreError::Notification(e.to_string()));
        }

        info!(cart = %cart.id, email = %email, "Order placed");
        Ok(())
    }
}
