//! The menu catalog: pizza type and size to unit price.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub pizzas: BTreeMap<String, MenuEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub description: String,
    /// Size to price in whole currency units.
    pub prices: BTreeMap<String, u64>,
}

impl Menu {
    /// Unit price for a pizza type and size, if the catalog carries it.
    pub fn unit_price(&self, pizza: &str, size: &str) -> Option<u64> {
        self.pizzas
            .get(pizza)
            .and_then(|entry| entry.prices.get(size))
            .copied()
    }

    /// The catalog seeded on first startup. The record in the store is
    /// authoritative afterwards and may be edited out of band.
    pub fn default_catalog() -> Self {
        let mut pizzas = BTreeMap::new();
        pizzas.insert(
            "margherita".to_string(),
            MenuEntry::new("Tomato, mozzarella and basil", &[("small", 8), ("medium", 10), ("large", 12)]),
        );
        pizzas.insert(
            "pepperoni".to_string(),
            MenuEntry::new("Tomato, mozzarella and pepperoni", &[("small", 9), ("medium", 11), ("large", 13)]),
        );
        pizzas.insert(
            "hawaiian".to_string(),
            MenuEntry::new("Tomato, mozzarella, ham and pineapple", &[("small", 9), ("medium", 11), ("large", 13)]),
        );
        pizzas.insert(
            "veggie".to_string(),
            MenuEntry::new("Tomato, mozzarella and grilled vegetables", &[("small", 8), ("medium", 10), ("large", 12)]),
        );
        pizzas.insert(
            "four-cheese".to_string(),
            MenuEntry::new("Mozzarella, gorgonzola, parmesan and fontina", &[("small", 10), ("medium", 12), ("large", 14)]),
        );
        Self { pizzas }
    }
}

impl MenuEntry {
    fn new(description: &str, prices: &[(&str, u64)]) -> Self {
        Self {
            description: description.to_string(),
            prices: prices
                .iter()
                .map(|(size, price)| (size.to_string(), *price))
                .collect(),
        }
    }
}
