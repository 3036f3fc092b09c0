use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, id::EntityId};

/// A vendor stock is purchased from. Movements may optionally reference one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Supplier {
    pub fn from_draft(draft: SupplierDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            contact: normalize_text(draft.contact),
            notes: normalize_text(draft.notes),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: SupplierPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(contact) = patch.contact {
            self.contact = normalize_text(contact);
        }
        if let Some(notes) = patch.notes {
            self.notes = normalize_text(notes);
        }
        self.updated_at = Some(now);
    }
}

impl Identifiable for Supplier {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Displayable for Supplier {
    fn display_label(&self) -> String {
        match &self.contact {
            Some(contact) => format!("{} <{}>", self.name, contact),
            None => self.name.clone(),
        }
    }
}

impl Timestamped for Supplier {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierDraft {
    pub name: String,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

impl SupplierDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for a supplier. Optional text fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}
