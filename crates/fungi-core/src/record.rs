//! Uniform CRUD surface over the four inventory collections.

use chrono::{DateTime, Utc};
use fungi_domain::{
    Category, CategoryDraft, CategoryPatch, EntityId, EntityKind, Identifiable, Inventory, Item,
    ItemDraft, ItemPatch, Movement, MovementDraft, MovementPatch, Supplier, SupplierDraft,
    SupplierPatch,
};

use crate::{CoreError, CoreResult};

/// A record type stored in one of the [`Inventory`] collections.
pub trait Record: Clone + Identifiable {
    type Draft;
    type Patch;

    const KIND: EntityKind;

    fn create(draft: Self::Draft, id: EntityId, now: DateTime<Utc>) -> Self;
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn collection(inventory: &Inventory) -> &Vec<Self>;
    fn collection_mut(inventory: &mut Inventory) -> &mut Vec<Self>;

    /// Checks the record after a create or an update, before it is stored.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Refuses removal while other records depend on this one.
    fn ensure_removable(_inventory: &Inventory, _id: &EntityId) -> CoreResult<()> {
        Ok(())
    }
}

fn require_text(value: &str, field: &str, kind: EntityKind) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{kind} {field} must not be empty")));
    }
    Ok(())
}

impl Record for Item {
    type Draft = ItemDraft;
    type Patch = ItemPatch;

    const KIND: EntityKind = EntityKind::Item;

    fn create(draft: ItemDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Item::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        self.apply_patch(patch, now);
    }

    fn collection(inventory: &Inventory) -> &Vec<Self> {
        &inventory.items
    }

    fn collection_mut(inventory: &mut Inventory) -> &mut Vec<Self> {
        &mut inventory.items
    }

    fn validate(&self) -> CoreResult<()> {
        require_text(&self.name, "name", Self::KIND)?;
        require_text(&self.unit, "unit", Self::KIND)
    }
}

impl Record for Category {
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const KIND: EntityKind = EntityKind::Category;

    fn create(draft: CategoryDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Category::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: CategoryPatch, now: DateTime<Utc>) {
        self.apply_patch(patch, now);
    }

    fn collection(inventory: &Inventory) -> &Vec<Self> {
        &inventory.categories
    }

    fn collection_mut(inventory: &mut Inventory) -> &mut Vec<Self> {
        &mut inventory.categories
    }

    fn validate(&self) -> CoreResult<()> {
        require_text(&self.name, "name", Self::KIND)
    }

    fn ensure_removable(inventory: &Inventory, id: &EntityId) -> CoreResult<()> {
        let references = inventory.items_in_category(id);
        if references > 0 {
            return Err(CoreError::ReferentialIntegrity {
                kind: Self::KIND,
                id: id.clone(),
                references,
            });
        }
        Ok(())
    }
}

impl Record for Supplier {
    type Draft = SupplierDraft;
    type Patch = SupplierPatch;

    const KIND: EntityKind = EntityKind::Supplier;

    fn create(draft: SupplierDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Supplier::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: SupplierPatch, now: DateTime<Utc>) {
        self.apply_patch(patch, now);
    }

    fn collection(inventory: &Inventory) -> &Vec<Self> {
        &inventory.suppliers
    }

    fn collection_mut(inventory: &mut Inventory) -> &mut Vec<Self> {
        &mut inventory.suppliers
    }

    fn validate(&self) -> CoreResult<()> {
        require_text(&self.name, "name", Self::KIND)
    }
}

impl Record for Movement {
    type Draft = MovementDraft;
    type Patch = MovementPatch;

    const KIND: EntityKind = EntityKind::Movement;

    fn create(draft: MovementDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Movement::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: MovementPatch, now: DateTime<Utc>) {
        self.apply_patch(patch, now);
    }

    fn collection(inventory: &Inventory) -> &Vec<Self> {
        &inventory.movements
    }

    fn collection_mut(inventory: &mut Inventory) -> &mut Vec<Self> {
        &mut inventory.movements
    }
}
