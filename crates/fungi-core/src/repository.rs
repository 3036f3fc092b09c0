//! The single owner of the inventory collections.

use std::path::Path;

use chrono::Utc;
use fungi_domain::{EntityId, EntityKind, Inventory, Item, Movement, MovementEntry, MovementPatch};

use crate::{
    ledger::{compute_low_stock_items, compute_stock, compute_total_value},
    query::{movement_history, MovementFilter, Page, PageRequest},
    record::Record,
    storage::{inventory_warnings, BackupInfo, InventoryStore, LoadReport},
    summary::{
        category_usage, inventory_summary, stock_levels, CategoryUsage, InventorySummary,
        StockLevel,
    },
    CoreError, CoreResult,
};

/// Owns the four collections and saves a full snapshot after every mutation.
///
/// A failed save is reported to the caller but the in-memory change is kept.
pub struct Repository {
    inventory: Inventory,
    store: Box<dyn InventoryStore>,
}

impl Repository {
    /// Loads the persisted snapshot and returns the repository together with
    /// any load or consistency warnings.
    pub fn open(store: Box<dyn InventoryStore>) -> (Self, Vec<String>) {
        let LoadReport {
            inventory,
            mut warnings,
            ..
        } = store.load();
        warnings.extend(inventory_warnings(&inventory));
        for warning in &warnings {
            tracing::warn!(%warning, "inventory loaded with warning");
        }
        tracing::info!(
            items = inventory.items.len(),
            movements = inventory.movements.len(),
            "inventory loaded"
        );
        (Self { inventory, store }, warnings)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn add<R: Record>(&mut self, draft: R::Draft) -> CoreResult<R> {
        let record = R::create(draft, EntityId::generate(), Utc::now());
        record.validate()?;
        R::collection_mut(&mut self.inventory).push(record.clone());
        tracing::info!(kind = %R::KIND, id = %record.id(), "record added");
        self.persist()?;
        Ok(record)
    }

    pub fn update<R: Record>(&mut self, id: &EntityId, patch: R::Patch) -> CoreResult<R> {
        let collection = R::collection_mut(&mut self.inventory);
        let slot = collection
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| CoreError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            })?;
        let mut updated = slot.clone();
        updated.apply(patch, Utc::now());
        updated.validate()?;
        *slot = updated.clone();
        tracing::info!(kind = %R::KIND, %id, "record updated");
        self.persist()?;
        Ok(updated)
    }

    /// Removes every record with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete<R: Record>(&mut self, id: &EntityId) -> CoreResult<bool> {
        R::ensure_removable(&self.inventory, id)?;
        let collection = R::collection_mut(&mut self.inventory);
        let before = collection.len();
        collection.retain(|record| record.id() != id);
        let removed = collection.len() != before;
        tracing::info!(kind = %R::KIND, %id, removed, "record deleted");
        self.persist()?;
        Ok(removed)
    }

    pub fn get<R: Record>(&self, id: &EntityId) -> Option<&R> {
        R::collection(&self.inventory)
            .iter()
            .find(|record| record.id() == id)
    }

    pub fn list<R: Record>(&self) -> &[R] {
        R::collection(&self.inventory)
    }

    /// Records a movement against an existing item, copying its category and unit.
    pub fn record_movement(&mut self, entry: MovementEntry) -> CoreResult<Movement> {
        let item = self.require_item(&entry.item_id)?;
        let draft = entry.into_draft(item);
        self.add::<Movement>(draft)
    }

    /// Updates a movement; pointing it at another item re-copies that item's
    /// category and unit.
    pub fn update_movement(
        &mut self,
        id: &EntityId,
        patch: MovementPatch,
    ) -> CoreResult<Movement> {
        let patch = match patch.item_id.clone() {
            Some(item_id) => {
                let item = self.require_item(&item_id)?;
                patch.retarget(item)
            }
            None => patch,
        };
        self.update::<Movement>(id, patch)
    }

    /// Replaces every collection at once and saves.
    pub fn replace_all(&mut self, inventory: Inventory) -> CoreResult<()> {
        self.inventory = inventory;
        tracing::info!("inventory replaced");
        self.persist()
    }

    pub fn current_stock(&self, item_id: &EntityId) -> f64 {
        compute_stock(item_id, &self.inventory.movements)
    }

    pub fn total_value(&self) -> f64 {
        compute_total_value(&self.inventory.items, &self.inventory.movements)
    }

    pub fn low_stock_items(&self) -> Vec<&Item> {
        compute_low_stock_items(&self.inventory.items, &self.inventory.movements)
    }

    pub fn summary(&self, preview: usize) -> InventorySummary {
        inventory_summary(&self.inventory, preview)
    }

    pub fn stock_levels(&self) -> Vec<StockLevel> {
        stock_levels(&self.inventory)
    }

    pub fn category_usage(&self) -> Vec<CategoryUsage> {
        category_usage(&self.inventory)
    }

    pub fn movement_history(
        &self,
        filter: &MovementFilter,
        request: PageRequest,
    ) -> CoreResult<Page<&Movement>> {
        movement_history(&self.inventory.movements, filter, request)
    }

    pub fn export_to(&self, path: &Path) -> CoreResult<()> {
        self.store.export_to_path(&self.inventory, path)?;
        tracing::info!(path = %path.display(), "inventory exported");
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> CoreResult<BackupInfo> {
        self.store.backup(&self.inventory, note)
    }

    pub fn list_backups(&self) -> CoreResult<Vec<BackupInfo>> {
        self.store.list_backups()
    }

    /// Restores a backup into the data file and reloads from it.
    pub fn restore(&mut self, backup: &BackupInfo) -> CoreResult<Vec<String>> {
        let LoadReport {
            inventory,
            mut warnings,
            ..
        } = self.store.restore_backup(backup)?;
        warnings.extend(inventory_warnings(&inventory));
        self.inventory = inventory;
        tracing::info!(backup = %backup.id, "inventory restored");
        Ok(warnings)
    }

    fn require_item(&self, item_id: &EntityId) -> CoreResult<&Item> {
        self.inventory.item(item_id).ok_or_else(|| CoreError::NotFound {
            kind: EntityKind::Item,
            id: item_id.clone(),
        })
    }

    fn persist(&self) -> CoreResult<()> {
        self.store.save(&self.inventory).map_err(|err| {
            tracing::error!(error = %err, "failed to save inventory");
            err
        })
    }
}
