use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fungi_core::{
    compute_low_stock_items, compute_stock, compute_total_value, movement_history,
    MovementFilter, PageRequest,
};
use fungi_domain::{
    Category, EntityId, Inventory, Item, ItemDraft, Movement, MovementEntry, MovementKind,
};

fn build_sample_inventory(item_count: usize, movement_count: usize) -> Inventory {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let category = Category::new("Substrats");
    let items: Vec<Item> = (0..item_count)
        .map(|idx| {
            let draft = ItemDraft::new(format!("Item {idx}"), category.id.clone(), "kg")
                .with_threshold(50.0)
                .with_price(0.5 + (idx % 10) as f64 / 10.0);
            Item::from_draft(draft, EntityId::generate(), start)
        })
        .collect();

    let movements = (0..movement_count)
        .map(|idx| {
            let item = &items[idx % items.len()];
            let kind = MovementKind::ALL[idx % MovementKind::ALL.len()];
            let entry = MovementEntry::new(kind, item.id.clone(), 1.0 + (idx % 25) as f64)
                .dated(start + Duration::minutes(idx as i64));
            Movement::from_draft(entry.into_draft(item), EntityId::generate(), start)
        })
        .collect();

    Inventory {
        items,
        categories: vec![category],
        suppliers: Vec::new(),
        movements,
    }
}

fn bench_stock(c: &mut Criterion) {
    let inventory = build_sample_inventory(200, black_box(20_000));
    let target = inventory.items[0].id.clone();

    c.bench_function("compute_stock_20k", |b| {
        b.iter(|| black_box(compute_stock(&target, &inventory.movements)))
    });

    c.bench_function("total_value_200_items", |b| {
        b.iter(|| black_box(compute_total_value(&inventory.items, &inventory.movements)))
    });

    c.bench_function("low_stock_200_items", |b| {
        b.iter(|| {
            let low = compute_low_stock_items(&inventory.items, &inventory.movements);
            black_box(low.len())
        })
    });
}

fn bench_history(c: &mut Criterion) {
    let inventory = build_sample_inventory(200, black_box(20_000));
    let filter = MovementFilter::of_kind(MovementKind::In);

    c.bench_function("movement_history_first_page", |b| {
        b.iter(|| {
            let page = movement_history(&inventory.movements, &filter, PageRequest::default())
                .unwrap();
            black_box(page.total)
        })
    });
}

criterion_group!(benches, bench_stock, bench_history);
criterion_main!(benches);
