//! The aggregate of all four record collections.

use serde::{Deserialize, Serialize};

use crate::{
    category::Category, id::EntityId, item::Item, movement::Movement, supplier::Supplier,
};

/// Every collection the application owns, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.categories.is_empty()
            && self.suppliers.is_empty()
            && self.movements.is_empty()
    }

    pub fn item(&self, id: &EntityId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == *id)
    }

    pub fn category(&self, id: &EntityId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == *id)
    }

    pub fn supplier(&self, id: &EntityId) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == *id)
    }

    /// Number of items currently filed under the category.
    pub fn items_in_category(&self, category_id: &EntityId) -> usize {
        self.items
            .iter()
            .filter(|item| item.category_id == *category_id)
            .count()
    }

}
