use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use fungi_domain::Inventory;

use crate::CoreResult;

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Outcome of reading the persisted snapshot.
///
/// Loading never fails: unreadable or malformed data degrades to empty
/// collections and the reasons are collected in `warnings`.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub inventory: Inventory,
    pub warnings: Vec<String>,
    pub version: Option<u32>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl LoadReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Describes a persisted backup copy of the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends for the inventory snapshot.
pub trait InventoryStore: Send + Sync {
    fn load(&self) -> LoadReport;
    fn save(&self, inventory: &Inventory) -> CoreResult<()>;
    fn export_to_path(&self, inventory: &Inventory, path: &Path) -> CoreResult<()>;
    fn backup(&self, inventory: &Inventory, note: Option<&str>) -> CoreResult<BackupInfo>;
    fn list_backups(&self) -> CoreResult<Vec<BackupInfo>>;
    fn restore_backup(&self, backup: &BackupInfo) -> CoreResult<LoadReport>;
}

/// File name used when exporting into a directory.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("fungistock-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Detects dangling references within an inventory snapshot.
pub fn inventory_warnings(inventory: &Inventory) -> Vec<String> {
    let item_ids: HashSet<_> = inventory.items.iter().map(|i| &i.id).collect();
    let category_ids: HashSet<_> = inventory.categories.iter().map(|c| &c.id).collect();
    let supplier_ids: HashSet<_> = inventory.suppliers.iter().map(|s| &s.id).collect();
    let mut warnings = Vec::new();

    for item in &inventory.items {
        if !category_ids.contains(&item.category_id) {
            warnings.push(format!(
                "item {} references unknown category {}",
                item.id, item.category_id
            ));
        }
    }
    for movement in &inventory.movements {
        if !item_ids.contains(&movement.item_id) {
            warnings.push(format!(
                "movement {} references unknown item {}",
                movement.id, movement.item_id
            ));
        }
        if !category_ids.contains(&movement.category_id) {
            warnings.push(format!(
                "movement {} references unknown category {}",
                movement.id, movement.category_id
            ));
        }
        if let Some(supplier) = &movement.supplier_id {
            if !supplier_ids.contains(supplier) {
                warnings.push(format!(
                    "movement {} references unknown supplier {}",
                    movement.id, supplier
                ));
            }
        }
    }
    warnings
}
