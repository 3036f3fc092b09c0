//! Read-side views used by the dashboard and listings.

use fungi_domain::{EntityId, Inventory};

use crate::ledger::{compute_low_stock_items, compute_stock, compute_total_value};

pub const DEFAULT_LOW_STOCK_PREVIEW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LowStockEntry {
    pub item_id: EntityId,
    pub name: String,
    pub stock: f64,
    pub threshold: f64,
    pub unit: String,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_stock: f64,
    pub total_value: f64,
    pub low_stock_count: usize,
    /// At most `preview` entries, lowest stock first.
    pub low_stock: Vec<LowStockEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockLevel {
    pub item_id: EntityId,
    pub name: String,
    pub unit: String,
    pub stock: f64,
    pub threshold: f64,
    pub low: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUsage {
    pub category_id: EntityId,
    pub name: String,
    pub item_count: usize,
}

pub fn inventory_summary(inventory: &Inventory, preview: usize) -> InventorySummary {
    let movements = &inventory.movements;
    let total_stock = inventory
        .items
        .iter()
        .map(|item| compute_stock(&item.id, movements))
        .sum();
    let low = compute_low_stock_items(&inventory.items, movements);
    let low_stock = low
        .iter()
        .take(preview)
        .map(|item| LowStockEntry {
            item_id: item.id.clone(),
            name: item.name.clone(),
            stock: compute_stock(&item.id, movements),
            threshold: item.low_stock_threshold,
            unit: item.unit.clone(),
        })
        .collect();
    InventorySummary {
        item_count: inventory.items.len(),
        total_stock,
        total_value: compute_total_value(&inventory.items, movements),
        low_stock_count: low.len(),
        low_stock,
    }
}

/// Current stock of every item, in insertion order.
pub fn stock_levels(inventory: &Inventory) -> Vec<StockLevel> {
    inventory
        .items
        .iter()
        .map(|item| {
            let stock = compute_stock(&item.id, &inventory.movements);
            StockLevel {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit: item.unit.clone(),
                stock,
                threshold: item.low_stock_threshold,
                low: stock < item.low_stock_threshold,
            }
        })
        .collect()
}

pub fn category_usage(inventory: &Inventory) -> Vec<CategoryUsage> {
    inventory
        .categories
        .iter()
        .map(|category| CategoryUsage {
            category_id: category.id.clone(),
            name: category.name.clone(),
            item_count: inventory.items_in_category(&category.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_inventory;
    use chrono::Utc;

    #[test]
    fn demo_summary_matches_expected_figures() {
        let inventory = demo_inventory(Utc::now());
        let summary = inventory_summary(&inventory, DEFAULT_LOW_STOCK_PREVIEW);

        assert_eq!(summary.item_count, 4);
        // 155 kg + 450 pcs - 2 pcs + 0
        assert!((summary.total_stock - 603.0).abs() < 1e-9);
        // 155 * 0.85 + 450 * 0.12 - 2 * 1.20
        assert!((summary.total_value - 183.35).abs() < 1e-9);
        let names: Vec<&str> = summary.low_stock.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Filtres 0.22µm", "Gants nitrile"]);
        assert_eq!(summary.low_stock_count, 2);
    }

    #[test]
    fn preview_limits_entries_but_not_count() {
        let inventory = demo_inventory(Utc::now());
        let summary = inventory_summary(&inventory, 1);
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock_count, 2);
    }

    #[test]
    fn category_usage_counts_items() {
        let inventory = demo_inventory(Utc::now());
        let usage = category_usage(&inventory);
        assert_eq!(usage.len(), 4);
        assert!(usage.iter().all(|entry| entry.item_count == 1));

        let levels = stock_levels(&inventory);
        assert_eq!(levels[0].name, "Pellets paille bio");
        assert_eq!(levels[0].stock, 155.0);
        assert!(!levels[0].low);
    }
}
