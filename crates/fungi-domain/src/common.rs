//! Shared traits and enums for inventory records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Exposes a stable identifier for entities stored in the inventory.
pub trait Identifiable {
    fn id(&self) -> &EntityId;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Creation and last-modification stamps carried by every record.
///
/// `updated_at` stays empty until the record is edited for the first time.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at().unwrap_or_else(|| self.created_at())
    }
}

/// Names the four record collections owned by an [`crate::Inventory`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Category,
    Supplier,
    Movement,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Item => "item",
            EntityKind::Category => "category",
            EntityKind::Supplier => "supplier",
            EntityKind::Movement => "movement",
        };
        f.write_str(label)
    }
}

/// Trims optional free text and drops it when nothing is left.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
