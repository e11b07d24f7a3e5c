//! Cart lifecycle: creation, retrieval, item deltas and deletion.
//!
//! Creation is all-or-nothing: one unpriceable line fails the whole request.
//! Updates are best-effort: valid deltas commit even when others are
//! rejected, and the invalid ones are reported back with the updated cart.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::{CoreError, MenuCatalog, TokenGate};
use crate::crypto;
use crate::models::{Cart, CartItem, ItemDelta, ItemRequest};
use crate::store::{self, Store, StoreError};

/// Cart ids are 10 random lowercase alphanumeric characters.
pub const CART_ID_LEN: usize = 10;

/// Outcome of a best-effort update: the persisted cart plus the deltas that
/// could not be applied.
#[derive(Debug, Serialize)]
pub struct CartUpdate {
    pub cart: Cart,
    pub invalid_items: Vec<serde_json::Value>,
}

#[derive(Clone)]
pub struct CartEngine {
    store: Arc<dyn Store>,
    gate: TokenGate,
    catalog: MenuCatalog,
}

impl CartEngine {
    pub fn new(store: Arc<dyn Store>, gate: TokenGate, catalog: MenuCatalog) -> Self {
        Self {
            store,
            gate,
            catalog,
        }
    }

    /// Price every requested line against the menu and persist a new cart.
    /// If any line is structurally invalid or absent from the menu, nothing
    /// is persisted and the full invalid set is reported.
    pub async fn create(
        &self,
        token: &str,
        email: &str,
        requests: &[ItemRequest],
    ) -> Result<Cart, CoreError> {
        if requests.is_empty() {
            return Err(CoreError::Validation(vec!["items".to_string()]));
        }
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }

        let menu = self.catalog.load().await?;
        let mut items: Vec<CartItem> = Vec::new();
        let mut invalid = Vec::new();
        for request in requests {
            let qty = match request.qty {
                None => 1,
                Some(q) if q >= 1 => q,
                Some(_) => {
                    invalid.push(store::encode(request)?);
                    continue;
                }
            };
            let Some(unit) = menu.unit_price(&request.pizza, &request.size) else {
                invalid.push(store::encode(request)?);
                continue;
            };

            // repeated (type, size) lines merge instead of duplicating
            match items
                .iter_mut()
                .find(|item| item.pizza == request.pizza && item.size == request.size)
            {
                Some(item) => {
                    item.qty += qty;
                    item.subtotal = item.subtotal.saturating_add(unit.saturating_mul(qty as u64));
                }
                None => items.push(CartItem {
                    pizza: request.pizza.clone(),
                    size: request.size.clone(),
                    qty,
                    subtotal: unit.saturating_mul(qty as u64),
                }),
            }
        }

        if !invalid.is_empty() {
            return Err(CoreError::InvalidItems(invalid));
        }

        let total = items.iter().fold(0u64, |sum, item| sum.saturating_add(item.subtotal));
        let cart = Cart {
            id: crypto::random_id(CART_ID_LEN),
            email: email.to_string(),
            items,
            total,
        };
        self.store
            .create(store::CART, &cart.id, store::encode(&cart)?)
            .await?;

        info!(cart = %cart.id, email = %email, total = cart.total, "Created cart");
        Ok(cart)
    }

    /// Load a cart and check it belongs to `email`. A cart owned by someone
    /// else is an authorization failure, distinct from not-found.
    pub async fn fetch(&self, token: &str, email: &str, cart_id: &str) -> Result<Cart, CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }
        self.load_owned(email, cart_id).await
    }

    /// Apply quantity deltas to an existing cart. Deltas naming a line the
    /// cart never held are invalid; the rest commit as long as at least one
    /// applied. Lines whose quantity reaches zero (or below) are dropped,
    /// and every surviving line is repriced against the menu.
    pub async fn update(
        &self,
        token: &str,
        email: &str,
        cart_id: &str,
        deltas: &[ItemDelta],
    ) -> Result<CartUpdate, CoreError> {
        if deltas.is_empty() {
            return Err(CoreError::Validation(vec!["items".to_string()]));
        }
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }

        let mut cart = self.load_owned(email, cart_id).await?;
        let menu = self.catalog.load().await?;

        // fold deltas into per-line quantities, then rebuild the item list
        // from scratch rather than splicing it mid-iteration
        let mut working: Vec<(CartItem, i64)> = cart
            .items
            .iter()
            .map(|item| (item.clone(), item.qty))
            .collect();
        let mut invalid = Vec::new();
        let mut applied = 0usize;
        for delta in deltas {
            if delta.qty == 0 {
                invalid.push(store::encode(delta)?);
                continue;
            }
            match working
                .iter_mut()
                .find(|(item, _)| item.pizza == delta.pizza && item.size == delta.size)
            {
                Some((_, qty)) => {
                    *qty += delta.qty;
                    applied += 1;
                }
                None => invalid.push(store::encode(delta)?),
            }
        }

        if applied == 0 {
            return Err(CoreError::InvalidItems(invalid));
        }

        let mut items = Vec::with_capacity(working.len());
        let mut total = 0u64;
        for (item, qty) in working {
            if qty <= 0 {
                continue;
            }
            let unit = menu
                .unit_price(&item.pizza, &item.size)
                .unwrap_or_else(|| item.unit_price());
            let subtotal = unit.saturating_mul(qty as u64);
            total = total.saturating_add(subtotal);
            items.push(CartItem {
                pizza: item.pizza,
                size: item.size,
                qty,
                subtotal,
            });
        }
        cart.items = items;
        cart.total = total;

        self.store
            .update(store::CART, cart_id, store::encode(&cart)?)
            .await?;

        info!(cart = %cart.id, total = cart.total, rejected = invalid.len(), "Updated cart");
        Ok(CartUpdate {
            cart,
            invalid_items: invalid,
        })
    }

    /// Delete a cart after the ownership check.
    pub async fn remove(&self, token: &str, email: &str, cart_id: &str) -> Result<(), CoreError> {
        if !self.gate.verify(token, email).await {
            return Err(CoreError::InvalidToken);
        }
        self.load_owned(email, cart_id).await?;

        match self.store.delete(store::CART, cart_id).await {
            Ok(()) => {
                info!(cart = %cart_id, "Deleted cart");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(CoreError::CartNotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) async fn load_owned(&self, email: &str, cart_id: &str) -> Result<Cart, CoreError> {
        let cart: Cart = match self.store.read(store::CART, cart_id).await {
            Ok(record) => store::decode(record)?,
            Err(StoreError::NotFound) => return Err(CoreError::CartNotFound),
            Err(e) => return Err(e.into()),
        };
        if cart.email != email {
            return Err(CoreError::NotOwner);
        }
        Ok(cart)
    }
}
