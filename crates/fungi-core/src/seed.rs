//! Demonstration data set for first runs and walkthroughs.

use chrono::{DateTime, Duration, Utc};
use fungi_domain::{
    Category, CategoryDraft, EntityId, Inventory, Item, ItemDraft, Movement, MovementEntry,
    MovementKind, Supplier, SupplierDraft,
};

/// Builds the demo inventory: four categories, two suppliers, four items and
/// five movements dated 7, 5, 3, 2 and 1 days before `now`.
pub fn demo_inventory(now: DateTime<Utc>) -> Inventory {
    let categories: Vec<Category> = ["Pellets paille", "Sacs PP", "Filtres", "Consommables"]
        .into_iter()
        .map(|name| Category::from_draft(CategoryDraft::new(name), EntityId::generate(), now))
        .collect();

    let suppliers = vec![
        Supplier::from_draft(
            SupplierDraft::new("Normandie Pellets")
                .with_contact("contact@normandie-pellets.fr")
                .with_notes("Fournisseur principal de pellets"),
            EntityId::generate(),
            now,
        ),
        Supplier::from_draft(
            SupplierDraft::new("MycoSupply")
                .with_contact("+33 1 23 45 67 89")
                .with_notes("Matériel et consommables"),
            EntityId::generate(),
            now,
        ),
    ];

    let rows = [
        ("Pellets paille bio", "kg", 50.0, 0.85, "Substrat principal pour pleurotes"),
        ("Sacs 3kg", "pcs", 100.0, 0.12, "Sacs polypropylène pour conditionnement"),
        ("Filtres 0.22µm", "pcs", 50.0, 1.20, "Filtres stérilisants pour culture"),
        ("Gants nitrile", "boîte", 5.0, 8.50, "Protection individuelle"),
    ];
    let items: Vec<Item> = rows
        .into_iter()
        .zip(&categories)
        .map(|((name, unit, threshold, price, notes), category)| {
            let draft = ItemDraft::new(name, category.id.clone(), unit)
                .with_threshold(threshold)
                .with_price(price)
                .with_notes(notes);
            Item::from_draft(draft, EntityId::generate(), now)
        })
        .collect();

    let days_ago = |days: i64| now - Duration::days(days);
    let entries = vec![
        MovementEntry::new(MovementKind::In, items[0].id.clone(), 200.0)
            .dated(days_ago(7))
            .from_supplier(suppliers[0].id.clone())
            .at_price(0.85)
            .because("Commande mensuelle"),
        MovementEntry::new(MovementKind::In, items[1].id.clone(), 500.0)
            .dated(days_ago(5))
            .from_supplier(suppliers[1].id.clone())
            .at_price(0.12)
            .because("Réapprovisionnement"),
        MovementEntry::new(MovementKind::Use, items[0].id.clone(), 45.0)
            .dated(days_ago(3))
            .because("Production pleurotes lot #123"),
        MovementEntry::new(MovementKind::Out, items[1].id.clone(), 50.0)
            .dated(days_ago(2))
            .because("Livraison client"),
        MovementEntry::new(MovementKind::Lost, items[2].id.clone(), 2.0)
            .dated(days_ago(1))
            .because("Défaut qualité"),
    ];
    let movements = entries
        .into_iter()
        .filter_map(|entry| {
            let item = items.iter().find(|item| item.id == entry.item_id)?;
            Some(Movement::from_draft(entry.into_draft(item), EntityId::generate(), now))
        })
        .collect();

    Inventory {
        items,
        categories,
        suppliers,
        movements,
    }
}
