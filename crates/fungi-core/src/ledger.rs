//! Pure stock computations over a movement history.
//!
//! Nothing here touches storage or caches results; every figure is derived
//! from the slices passed in.

use fungi_domain::{EntityId, Item, Movement};

/// Net quantity on hand for `item_id`.
///
/// Inbound kinds (IN, DON) add their quantity, outbound kinds (OUT, USE, LOST)
/// subtract it. The result may be negative.
pub fn compute_stock(item_id: &EntityId, movements: &[Movement]) -> f64 {
    movements
        .iter()
        .filter(|movement| movement.item_id == *item_id)
        .fold(0.0, |stock, movement| stock + movement.signed_qty())
}

/// Sum of stock times default unit price over the given items.
pub fn compute_total_value(items: &[Item], movements: &[Movement]) -> f64 {
    let total = items
        .iter()
        .map(|item| compute_stock(&item.id, movements) * item.valuation_price())
        .sum();
    tracing::debug!(items = items.len(), total, "computed inventory value");
    total
}

/// Items strictly below their threshold, lowest stock first.
///
/// Ties keep the order of `items`.
pub fn compute_low_stock_items<'a>(items: &'a [Item], movements: &[Movement]) -> Vec<&'a Item> {
    let mut low: Vec<(&Item, f64)> = items
        .iter()
        .map(|item| (item, compute_stock(&item.id, movements)))
        .filter(|(item, stock)| *stock < item.low_stock_threshold)
        .collect();
    low.sort_by(|a, b| a.1.total_cmp(&b.1));
    low.into_iter().map(|(item, _)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fungi_domain::{ItemDraft, MovementEntry, MovementKind};

    fn item(name: &str, threshold: f64, price: Option<f64>) -> Item {
        let mut draft = ItemDraft::new(name, EntityId::generate(), "kg").with_threshold(threshold);
        draft.default_unit_price = price;
        Item::from_draft(draft, EntityId::generate(), Utc::now())
    }

    fn movement(item: &Item, kind: MovementKind, qty: f64) -> Movement {
        let draft = MovementEntry::new(kind, item.id.clone(), qty).into_draft(item);
        Movement::from_draft(draft, EntityId::generate(), Utc::now())
    }

    #[test]
    fn stock_adds_inbound_and_subtracts_outbound() {
        let pellets = item("Pellets", 0.0, None);
        let movements = vec![
            movement(&pellets, MovementKind::In, 200.0),
            movement(&pellets, MovementKind::Donation, 10.0),
            movement(&pellets, MovementKind::Out, 30.0),
            movement(&pellets, MovementKind::Use, 45.0),
            movement(&pellets, MovementKind::Lost, 5.0),
        ];
        assert_eq!(compute_stock(&pellets.id, &movements), 130.0);
    }

    #[test]
    fn stock_ignores_other_items_and_may_go_negative() {
        let sacs = item("Sacs", 0.0, None);
        let other = item("Filtres", 0.0, None);
        let movements = vec![
            movement(&other, MovementKind::In, 500.0),
            movement(&sacs, MovementKind::Out, 12.0),
        ];
        assert_eq!(compute_stock(&sacs.id, &movements), -12.0);
        assert_eq!(compute_stock(&EntityId::generate(), &movements), 0.0);
    }

    #[test]
    fn negative_quantity_inverts_direction() {
        let gants = item("Gants", 0.0, None);
        let movements = vec![movement(&gants, MovementKind::In, -3.0)];
        assert_eq!(compute_stock(&gants.id, &movements), -3.0);
    }

    #[test]
    fn stock_is_independent_of_movement_order() {
        let pellets = item("Pellets", 0.0, None);
        let mut movements = vec![
            movement(&pellets, MovementKind::In, 200.0),
            movement(&pellets, MovementKind::Use, 45.5),
            movement(&pellets, MovementKind::Lost, 0.25),
            movement(&pellets, MovementKind::Donation, 12.0),
        ];
        let forward = compute_stock(&pellets.id, &movements);
        movements.reverse();
        assert_eq!(compute_stock(&pellets.id, &movements), forward);
    }

    #[test]
    fn total_value_treats_missing_price_as_zero() {
        assert_eq!(compute_total_value(&[], &[]), 0.0);

        let priced = item("Pellets", 0.0, Some(0.5));
        let unpriced = item("Sacs", 0.0, None);
        let movements = vec![
            movement(&priced, MovementKind::In, 100.0),
            movement(&unpriced, MovementKind::In, 400.0),
        ];
        let total = compute_total_value(&[priced, unpriced], &movements);
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn low_stock_is_strict_and_sorted_ascending() {
        let at_threshold = item("Exact", 10.0, None);
        let lowest = item("Lowest", 50.0, None);
        let middle = item("Middle", 50.0, None);
        let zero_threshold = item("Zero", 0.0, None);
        let movements = vec![
            movement(&at_threshold, MovementKind::In, 10.0),
            movement(&lowest, MovementKind::In, 5.0),
            movement(&middle, MovementKind::In, 20.0),
        ];
        let items = vec![
            middle.clone(),
            at_threshold.clone(),
            zero_threshold,
            lowest.clone(),
        ];
        let low = compute_low_stock_items(&items, &movements);
        let names: Vec<&str> = low.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Lowest", "Middle"]);
    }

    #[test]
    fn low_stock_ties_keep_input_order() {
        let first = item("First", 5.0, None);
        let second = item("Second", 5.0, None);
        let items = vec![first, second];
        let low = compute_low_stock_items(&items, &[]);
        assert_eq!(low[0].name, "First");
        assert_eq!(low[1].name, "Second");
    }
}
