//! Stock movements: the only source of truth for quantities on hand.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, id::*, item::Item};

/// Closed set of movement types. Unknown codes are rejected when parsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MovementKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "USE")]
    Use,
    #[serde(rename = "LOST")]
    Lost,
    #[serde(rename = "DON")]
    Donation,
}

impl MovementKind {
    pub const ALL: [MovementKind; 5] = [
        MovementKind::In,
        MovementKind::Out,
        MovementKind::Use,
        MovementKind::Lost,
        MovementKind::Donation,
    ];

    /// `+1.0` for kinds that add stock, `-1.0` for kinds that consume it.
    pub fn direction(self) -> f64 {
        match self {
            MovementKind::In | MovementKind::Donation => 1.0,
            MovementKind::Out | MovementKind::Use | MovementKind::Lost => -1.0,
        }
    }

    /// Applies the kind's sign to a quantity. The quantity itself is not checked.
    pub fn signed(self, qty: f64) -> f64 {
        self.direction() * qty
    }

    /// Wire code used in snapshots and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
            MovementKind::Use => "USE",
            MovementKind::Lost => "LOST",
            MovementKind::Donation => "DON",
        }
    }

    /// Human label shown in listings.
    pub fn label(self) -> &'static str {
        match self {
            MovementKind::In => "Entrée",
            MovementKind::Out => "Sortie",
            MovementKind::Use => "Utilisation",
            MovementKind::Lost => "Perte",
            MovementKind::Donation => "Don",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MovementKind {
    type Err = ParseMovementKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(MovementKind::In),
            "OUT" => Ok(MovementKind::Out),
            "USE" => Ok(MovementKind::Use),
            "LOST" => Ok(MovementKind::Lost),
            "DON" => Ok(MovementKind::Donation),
            _ => Err(ParseMovementKindError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a movement type code is not one of IN, OUT, USE, LOST, DON.
pub struct ParseMovementKindError(pub String);

impl fmt::Display for ParseMovementKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown movement type `{}` (expected IN, OUT, USE, LOST or DON)",
            self.0
        )
    }
}

impl std::error::Error for ParseMovementKindError {}

/// A single recorded change to one item's stock.
///
/// `category_id` and `unit` are copies of the item's values at entry time so
/// history stays readable after the item is edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: EntityId,
    #[serde(rename = "dateISO", deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub item_id: EntityId,
    pub category_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<EntityId>,
    pub qty: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Movement {
    pub fn from_draft(draft: MovementDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date: draft.date,
            kind: draft.kind,
            item_id: draft.item_id,
            category_id: draft.category_id,
            supplier_id: draft.supplier_id,
            qty: draft.qty,
            unit: draft.unit,
            unit_price: draft.unit_price,
            reason: normalize_text(draft.reason),
            created_at: now,
            updated_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: MovementPatch, now: DateTime<Utc>) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(item_id) = patch.item_id {
            self.item_id = item_id;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(supplier_id) = patch.supplier_id {
            self.supplier_id = supplier_id;
        }
        if let Some(qty) = patch.qty {
            self.qty = qty;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(reason) = patch.reason {
            self.reason = normalize_text(reason);
        }
        self.updated_at = Some(now);
    }

    /// Contribution of this movement to its item's running stock.
    pub fn signed_qty(&self) -> f64 {
        self.kind.signed(self.qty)
    }
}

impl Identifiable for Movement {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Displayable for Movement {
    fn display_label(&self) -> String {
        format!("{} {} {}", self.kind.label(), self.qty, self.unit)
    }
}

impl Timestamped for Movement {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Fully specified movement payload, denormalized fields included.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementDraft {
    pub date: DateTime<Utc>,
    pub kind: MovementKind,
    pub item_id: EntityId,
    pub category_id: EntityId,
    pub supplier_id: Option<EntityId>,
    pub qty: f64,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub reason: Option<String>,
}

/// What a user enters when recording a movement; category and unit are
/// filled in from the referenced item.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementEntry {
    pub date: DateTime<Utc>,
    pub kind: MovementKind,
    pub item_id: EntityId,
    pub supplier_id: Option<EntityId>,
    pub qty: f64,
    pub unit_price: Option<f64>,
    pub reason: Option<String>,
}

impl MovementEntry {
    pub fn new(kind: MovementKind, item_id: EntityId, qty: f64) -> Self {
        Self {
            date: Utc::now(),
            kind,
            item_id,
            supplier_id: None,
            qty,
            unit_price: None,
            reason: None,
        }
    }

    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn from_supplier(mut self, supplier_id: EntityId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn at_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Completes the entry with the item's category and unit.
    pub fn into_draft(self, item: &Item) -> MovementDraft {
        MovementDraft {
            date: self.date,
            kind: self.kind,
            item_id: item.id.clone(),
            category_id: item.category_id.clone(),
            supplier_id: self.supplier_id,
            qty: self.qty,
            unit: item.unit.clone(),
            unit_price: self.unit_price,
            reason: self.reason,
        }
    }
}

/// Partial update for a movement. Clearable fields use `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementPatch {
    pub date: Option<DateTime<Utc>>,
    pub kind: Option<MovementKind>,
    pub item_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub supplier_id: Option<Option<EntityId>>,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Option<f64>>,
    pub reason: Option<Option<String>>,
}

impl MovementPatch {
    /// Points the movement at another item, re-copying its category and unit.
    pub fn retarget(mut self, item: &Item) -> Self {
        self.item_id = Some(item.id.clone());
        self.category_id = Some(item.category_id.clone());
        self.unit = Some(item.unit.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;

    #[test]
    fn kind_parses_codes_case_insensitively() {
        assert_eq!("in".parse::<MovementKind>(), Ok(MovementKind::In));
        assert_eq!(" DON ".parse::<MovementKind>(), Ok(MovementKind::Donation));
        assert!("TRANSFER".parse::<MovementKind>().is_err());
    }

    #[test]
    fn kind_direction_matches_stock_effect() {
        assert_eq!(MovementKind::In.signed(10.0), 10.0);
        assert_eq!(MovementKind::Donation.signed(10.0), 10.0);
        assert_eq!(MovementKind::Out.signed(10.0), -10.0);
        assert_eq!(MovementKind::Use.signed(10.0), -10.0);
        assert_eq!(MovementKind::Lost.signed(10.0), -10.0);
    }

    #[test]
    fn unknown_type_fails_deserialization() {
        let raw = serde_json::json!({
            "id": EntityId::generate(),
            "dateISO": "2024-03-01T10:00:00Z",
            "type": "SWAP",
            "itemId": EntityId::generate(),
            "categoryId": EntityId::generate(),
            "qty": 3.0,
            "unit": "kg",
            "createdAt": "2024-03-01T10:00:00Z"
        });
        assert!(serde_json::from_value::<Movement>(raw).is_err());
    }

    #[test]
    fn reads_dates_saved_without_offset() {
        let raw = serde_json::json!({
            "id": "_m1n2b3v4c",
            "dateISO": "2024-03-01T10:00:00",
            "type": "IN",
            "itemId": "_a1b2c3d4e",
            "categoryId": "_z9y8x7w6v",
            "qty": 200.0,
            "unit": "kg",
            "createdAt": "2024-03-01T10:05:00.000Z"
        });
        let movement: Movement = serde_json::from_value(raw).unwrap();
        assert_eq!(movement.date.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert_eq!(movement.item_id.as_str(), "_a1b2c3d4e");
        assert_eq!(movement.signed_qty(), 200.0);
    }

    #[test]
    fn serializes_type_and_date_fields() {
        let item = Item::from_draft(
            ItemDraft::new("Pellets", EntityId::generate(), "kg"),
            EntityId::generate(),
            Utc::now(),
        );
        let draft = MovementEntry::new(MovementKind::Lost, item.id.clone(), 2.0).into_draft(&item);
        let movement = Movement::from_draft(draft, EntityId::generate(), Utc::now());
        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["type"], "LOST");
        assert!(json.get("dateISO").is_some());
        assert_eq!(json["unit"], "kg");
        assert!(json.get("supplierId").is_none());
    }

    #[test]
    fn retarget_copies_item_category_and_unit() {
        let item = Item::from_draft(
            ItemDraft::new("Filtres", EntityId::generate(), "pcs"),
            EntityId::generate(),
            Utc::now(),
        );
        let patch = MovementPatch::default().retarget(&item);
        assert_eq!(patch.item_id, Some(item.id));
        assert_eq!(patch.category_id, Some(item.category_id));
        assert_eq!(patch.unit.as_deref(), Some("pcs"));
    }
}
