//! Domain types representing stock categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, id::EntityId};

/// Groups items for browsing and reporting (e.g. "Pellets paille", "Filtres").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_draft(CategoryDraft::new(name), EntityId::generate(), Utc::now())
    }

    pub fn from_draft(draft: CategoryDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            created_at: now,
            updated_at: None,
        }
    }

    /// Merges the populated patch fields and stamps the record as updated.
    pub fn apply_patch(&mut self, patch: CategoryPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        self.updated_at = Some(now);
    }
}

impl Identifiable for Category {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        self.name.clone()
    }
}

impl Timestamped for Category {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload used to create a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Partial update for a category; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
