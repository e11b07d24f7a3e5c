//! Cart records and the request shapes that mutate them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub email: String,
    pub items: Vec<CartItem>,
    /// Always equals the sum of `items[].subtotal`; re-established on
    /// every mutation.
    pub total: u64,
}

/// One priced line in a cart, unique per (type, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "type")]
    pub pizza: String,
    pub size: String,
    pub qty: i64,
    pub subtotal: u64,
}

impl CartItem {
    /// Unit price implied by the stored line, used when the catalog no
    /// longer carries the entry.
    pub fn unit_price(&self) -> u64 {
        if self.qty > 0 {
            self.subtotal / self.qty as u64
        } else {
            0
        }
    }
}

/// A line requested at cart creation. `qty` defaults to 1 and must be
/// positive when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    #[serde(rename = "type")]
    pub pizza: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<i64>,
}

/// A signed quantity adjustment against an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDelta {
    #[serde(rename = "type")]
    pub pizza: String,
    pub size: String,
    pub qty: i64,
}
