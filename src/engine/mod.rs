//! The ordering core: token gate, menu catalog, cart and order engines.
//!
//! Every state-mutating operation verifies the caller's token before it
//! touches the store. Engines return [`CoreError`] so the API layer can map
//! each failure class to its own response.

mod cart;
mod error;
mod menu;
mod order;
mod tokens;
mod users;

pub use cart::{CartEngine, CartUpdate, CART_ID_LEN};
pub use error::CoreError;
pub use menu::MenuCatalog;
pub use order::OrderEngine;
pub use tokens::{TokenGate, TOKEN_ID_LEN};
pub use users::UserEngine;
