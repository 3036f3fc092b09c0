use std::fs;

use chrono::Utc;
use fungi_core::{demo_inventory, storage::InventoryStore, Repository};
use fungi_domain::{Category, CategoryDraft, Inventory, MovementKind};
use fungi_storage_json::{decode_snapshot, JsonInventoryStore, StoragePaths};
use serde_json::Value;
use tempfile::tempdir;

fn store_in(dir: &std::path::Path) -> JsonInventoryStore {
    JsonInventoryStore::new(StoragePaths {
        data_file: dir.join("data").join("fungistock.json"),
        backup_root: dir.join("backups"),
    })
    .expect("create store")
}

#[test]
fn save_then_load_reproduces_collections() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    let inventory = demo_inventory(Utc::now());

    store.save(&inventory).expect("save snapshot");
    let report = store.load();

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.inventory, inventory);
    assert_eq!(report.version, Some(1));
    assert!(report.saved_at.is_some());
}

#[test]
fn snapshot_uses_versioned_layout() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    store.save(&demo_inventory(Utc::now())).expect("save");

    let raw = fs::read_to_string(store.data_file()).expect("read snapshot");
    let json: Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(json["version"], 1);
    assert!(json["timestamp"].is_string());
    for key in ["items", "categories", "suppliers", "movements"] {
        assert!(json[key].is_array(), "missing {key}");
    }
    let movement = &json["movements"][0];
    assert_eq!(movement["type"], "IN");
    assert!(movement["dateISO"].is_string());
    assert!(movement["itemId"].is_string());
    assert!(!store.data_file().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_loads_empty_without_warnings() {
    let dir = tempdir().expect("tempdir");
    let report = store_in(dir.path()).load();
    assert_eq!(report.inventory, Inventory::default());
    assert!(report.warnings.is_empty());
    assert_eq!(report.version, None);
}

#[test]
fn corrupt_file_loads_empty_with_warning() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    fs::write(store.data_file(), "{ not json").expect("write garbage");

    let report = store.load();
    assert_eq!(report.inventory, Inventory::default());
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn non_array_fields_and_bad_records_are_recovered() {
    let category_id = "6f1c2a0e-5a55-4d1b-9d0c-0f4f1c9b2a11";
    let item_id = "0b7f7e3a-2c1d-4e5f-8a9b-1c2d3e4f5a6b";
    let data = format!(
        r#"{{
            "version": 1,
            "items": {{"oops": true}},
            "categories": [
                {{"id": "{category_id}", "name": "Filtres", "createdAt": "2024-03-01T10:00:00Z"}}
            ],
            "movements": [
                {{"id": "2d3c4b5a-1f2e-4d3c-8b7a-6f5e4d3c2b1a", "dateISO": "2024-03-02T08:00:00Z",
                  "type": "IN", "itemId": "{item_id}", "categoryId": "{category_id}",
                  "supplierId": null, "qty": 12, "unit": "pcs", "unitPrice": null,
                  "createdAt": "2024-03-02T08:00:00Z"}},
                {{"id": "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d", "dateISO": "2024-03-03T08:00:00Z",
                  "type": "TRANSFER", "itemId": "{item_id}", "categoryId": "{category_id}",
                  "qty": 5, "unit": "pcs", "createdAt": "2024-03-03T08:00:00Z"}}
            ]
        }}"#
    );

    let report = decode_snapshot(&data);
    assert!(report.inventory.items.is_empty());
    assert!(report.inventory.suppliers.is_empty());
    assert_eq!(report.inventory.categories.len(), 1);
    assert_eq!(report.inventory.movements.len(), 1);
    assert_eq!(report.inventory.movements[0].kind, MovementKind::In);
    assert_eq!(report.inventory.movements[0].supplier_id, None);
    assert_eq!(report.warnings.len(), 2, "{:?}", report.warnings);
    assert!(report.warnings.iter().any(|w| w.contains("items")));
    assert!(report.warnings.iter().any(|w| w.contains("movements[1]")));
}

#[test]
fn newer_version_is_flagged() {
    let report = decode_snapshot(r#"{"version": 7, "items": []}"#);
    assert_eq!(report.version, Some(7));
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn backups_are_listed_restored_and_pruned() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths {
        data_file: dir.path().join("fungistock.json"),
        backup_root: dir.path().join("backups"),
    };
    let store = JsonInventoryStore::with_retention(paths.clone(), 3).expect("store");
    for stamp in ["20230101_0800", "20230102_0800", "20230103_0800", "20230104_0800"] {
        fs::write(
            paths.backup_root.join(format!("fungistock_{stamp}.json")),
            r#"{"version": 1}"#,
        )
        .expect("seed backup");
    }
    fs::write(paths.backup_root.join("readme.txt"), "ignored").expect("stray file");

    let inventory = demo_inventory(Utc::now());
    let info = store
        .backup(&inventory, Some("Avant tri"))
        .expect("create backup");
    assert!(info.id.starts_with("fungistock_"));
    assert!(info.id.ends_with("_avant-tri.json"));

    let backups = store.list_backups().expect("list backups");
    assert_eq!(backups.len(), 3);
    assert_eq!(backups[0].id, info.id);
    assert_eq!(backups[2].id, "fungistock_20230103_0800.json");

    store.save(&Inventory::default()).expect("overwrite data");
    let report = store.restore_backup(&info).expect("restore");
    assert_eq!(report.inventory, inventory);
    assert_eq!(store.load().inventory, inventory);
}

#[test]
fn backups_within_the_same_minute_are_kept_apart() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    let first = store
        .backup(&demo_inventory(Utc::now()), None)
        .expect("first backup");
    let second = store
        .backup(&Inventory::default(), None)
        .expect("second backup");

    assert_ne!(first.id, second.id);
    assert!(first.path.exists());
    assert!(second.path.exists());
    assert_eq!(store.list_backups().expect("list backups").len(), 2);
    assert_eq!(
        store.restore_backup(&first).expect("restore first").inventory.items.len(),
        4
    );
}

#[test]
fn offset_free_dates_are_read_as_utc() {
    let data = r#"{
        "categories": [
            {"id": "6f1c2a0e-5a55-4d1b-9d0c-0f4f1c9b2a11", "name": "Pellets paille",
             "createdAt": "2024-03-01T09:00:00Z"}
        ],
        "movements": [
            {"id": "2d3c4b5a-1f2e-4d3c-8b7a-6f5e4d3c2b1a", "dateISO": "2024-03-01T10:00:00",
             "type": "IN", "itemId": "0b7f7e3a-2c1d-4e5f-8a9b-1c2d3e4f5a6b",
             "categoryId": "6f1c2a0e-5a55-4d1b-9d0c-0f4f1c9b2a11",
             "qty": 200, "unit": "kg", "createdAt": "2024-03-01T10:00:00Z"},
            {"id": "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d", "dateISO": "2024-03-02T08:30",
             "type": "USE", "itemId": "0b7f7e3a-2c1d-4e5f-8a9b-1c2d3e4f5a6b",
             "categoryId": "6f1c2a0e-5a55-4d1b-9d0c-0f4f1c9b2a11",
             "qty": 45, "unit": "kg", "createdAt": "2024-03-02T08:30:00Z"}
        ]
    }"#;

    let report = decode_snapshot(data);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let movements = &report.inventory.movements;
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].date.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    assert_eq!(movements[1].date.to_rfc3339(), "2024-03-02T08:30:00+00:00");
}

#[test]
fn short_string_ids_survive_open_and_save() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    fs::write(
        store.data_file(),
        r#"{
            "items": [
                {"id": "_a1b2c3d4e", "name": "Pellets paille bio", "categoryId": "_k3j2h1g0f",
                 "unit": "kg", "lowStockThreshold": 50, "defaultUnitPrice": 0.85,
                 "createdAt": "2024-03-01T09:00:00.000Z"}
            ],
            "categories": [
                {"id": "_k3j2h1g0f", "name": "Pellets paille", "createdAt": "2024-03-01T09:00:00.000Z"}
            ],
            "suppliers": [],
            "movements": [
                {"id": "_m9n8b7v6c", "dateISO": "2024-03-01T10:00:00", "type": "IN",
                 "itemId": "_a1b2c3d4e", "categoryId": "_k3j2h1g0f", "qty": 200, "unit": "kg",
                 "createdAt": "2024-03-01T10:00:00.000Z"}
            ]
        }"#,
    )
    .expect("write snapshot");

    let (mut repo, warnings) = Repository::open(Box::new(store_in(dir.path())));
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(repo.inventory().items.len(), 1);
    assert_eq!(repo.inventory().categories.len(), 1);
    assert_eq!(repo.inventory().movements.len(), 1);

    let item = repo.inventory().items[0].id.clone();
    assert_eq!(item.as_str(), "_a1b2c3d4e");
    assert_eq!(repo.current_stock(&item), 200.0);

    repo.add::<Category>(CategoryDraft::new("Sacs PP"))
        .expect("add category");
    let raw = fs::read_to_string(store.data_file()).expect("read snapshot");
    assert!(raw.contains("\"_a1b2c3d4e\""));
    assert!(raw.contains("\"_m9n8b7v6c\""));

    let reloaded = store.load();
    assert!(reloaded.warnings.is_empty(), "{:?}", reloaded.warnings);
    assert_eq!(reloaded.inventory.items[0].id.as_str(), "_a1b2c3d4e");
    assert_eq!(reloaded.inventory.categories.len(), 2);
}

#[test]
fn restoring_missing_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    let info = fungi_core::BackupInfo {
        id: "fungistock_20240101_0000.json".into(),
        created_at: "2024-01-01 00:00".into(),
        path: dir.path().join("nope.json"),
    };
    assert!(store.restore_backup(&info).is_err());
}

#[test]
fn repository_persists_through_json_store() {
    let dir = tempdir().expect("tempdir");
    let (mut repo, _) = Repository::open(Box::new(store_in(dir.path())));
    repo.add::<Category>(CategoryDraft::new("Sacs PP"))
        .expect("add category");

    let export = dir.path().join("exports").join("copy.json");
    repo.export_to(&export).expect("export");
    assert!(export.exists());

    let (reopened, warnings) = Repository::open(Box::new(store_in(dir.path())));
    assert!(warnings.is_empty());
    assert_eq!(reopened.inventory().categories.len(), 1);
    assert_eq!(reopened.inventory().categories[0].name, "Sacs PP");
}
