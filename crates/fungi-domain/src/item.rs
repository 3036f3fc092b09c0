//! Domain types representing stocked items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, id::EntityId};

/// A stocked article. Its quantity on hand is never stored; it is derived from
/// the movement history on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub category_id: EntityId,
    pub unit: String,
    #[serde(default)]
    pub low_stock_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn from_draft(draft: ItemDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            category_id: draft.category_id,
            unit: draft.unit.trim().to_string(),
            low_stock_threshold: draft.low_stock_threshold,
            default_unit_price: draft.default_unit_price,
            notes: normalize_text(draft.notes),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit.trim().to_string();
        }
        if let Some(threshold) = patch.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        if let Some(price) = patch.default_unit_price {
            self.default_unit_price = price;
        }
        if let Some(notes) = patch.notes {
            self.notes = normalize_text(notes);
        }
        self.updated_at = Some(now);
    }

    /// Unit price used for valuation; an absent price counts as zero.
    pub fn valuation_price(&self) -> f64 {
        self.default_unit_price.unwrap_or(0.0)
    }
}

impl Identifiable for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Displayable for Item {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.unit)
    }
}

impl Timestamped for Item {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload used to create an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub category_id: EntityId,
    pub unit: String,
    pub low_stock_threshold: f64,
    pub default_unit_price: Option<f64>,
    pub notes: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, category_id: EntityId, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id,
            unit: unit.into(),
            low_stock_threshold: 0.0,
            default_unit_price: None,
            notes: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.default_unit_price = Some(price);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for an item. Clearable fields use `Some(None)` to remove the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category_id: Option<EntityId>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<f64>,
    pub default_unit_price: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}
