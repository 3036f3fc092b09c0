mod common;

use assert_fs::prelude::*;
use chrono::Utc;
use common::ScriptHome;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn seed_then_dashboard_shows_demo_figures() {
    let home = ScriptHome::new();
    home.run(&["seed", "dashboard", "exit"])
        .success()
        .stdout(contains(
            "Demo data loaded: 4 categories, 2 suppliers, 4 items, 5 movements.",
        ))
        .stdout(contains("Total stock  : 603"))
        .stdout(contains("Total value  : 183,35 €"))
        .stdout(contains("Low stock    : 2"))
        .stdout(contains("Filtres 0.22µm"))
        .stdout(contains("Gants nitrile"));
}

#[test]
fn movements_drive_stock_and_persist() {
    let home = ScriptHome::new();
    home.run(&[
        "category add Substrats",
        r#"item add "Pellets paille bio" category=Substrats unit=kg threshold=50 price=0.85"#,
        r#"move add IN "Pellets paille bio" 200 reason="Commande mensuelle""#,
        r#"move add USE "Pellets paille bio" 45"#,
        r#"stock "Pellets paille bio""#,
    ])
    .success()
    .stdout(contains("Item `Pellets paille bio` added"))
    .stdout(contains("Pellets paille bio: 155 kg"))
    .stdout(contains("is low").not());

    let snapshot = home.snapshot();
    assert_eq!(snapshot["version"], 1);
    let movements = snapshot["movements"].as_array().unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["type"], "IN");
    assert_eq!(movements[1]["type"], "USE");
    assert_eq!(movements[1]["unit"], "kg");
    assert_eq!(
        movements[0]["categoryId"],
        snapshot["categories"][0]["id"]
    );
}

#[test]
fn crossing_the_threshold_warns() {
    let home = ScriptHome::new();
    home.run(&[
        "category add Substrats",
        r#"item add "Pellets paille bio" category=Substrats unit=kg threshold=50"#,
        r#"move add IN "Pellets paille bio" 200"#,
        r#"move add USE "Pellets paille bio" 165"#,
    ])
    .success()
    .stdout(contains("`Pellets paille bio` is low: 35 kg left (threshold 50 kg)."));
}

#[test]
fn donations_add_to_stock() {
    let home = ScriptHome::new();
    home.run(&[
        "category add Substrats",
        r#"item add "Pellets paille bio" category=Substrats unit=kg"#,
        r#"move add DON "Pellets paille bio" 10"#,
        r#"stock "Pellets paille bio""#,
        "help move",
    ])
    .success()
    .stdout(contains("Don 10 kg recorded for `Pellets paille bio`"))
    .stdout(contains("Stock now 10 kg."))
    .stdout(contains("Pellets paille bio: 10 kg"))
    .stdout(contains("IN and DON add stock; OUT, USE and LOST remove it."));

    let snapshot = home.snapshot();
    assert_eq!(snapshot["movements"][0]["type"], "DON");
    assert_eq!(snapshot["movements"][0]["qty"], 10.0);
}

#[test]
fn category_in_use_cannot_be_removed() {
    let home = ScriptHome::new();
    home.run(&[
        "category add Filtres",
        r#"item add "Filtres 0.22µm" category=Filtres unit=pcs"#,
        "category remove Filtres",
        "category list",
    ])
    .success()
    .stdout(contains("still used by 1 item(s)"))
    .stdout(contains("hint: Move or delete those items first."))
    .stdout(contains("Category `Filtres` deleted.").not());

    let snapshot = home.snapshot();
    assert_eq!(snapshot["categories"].as_array().unwrap().len(), 1);
}

#[test]
fn removing_an_item_keeps_its_movements() {
    let home = ScriptHome::new();
    home.run(&["seed", r#"item remove "Sacs 3kg""#, "move list limit=20"])
        .success()
        .stdout(contains("Item `Sacs 3kg` deleted."))
        .stdout(contains("(deleted "))
        .stdout(contains("Page 1/1 (5 movements)"));

    let snapshot = home.snapshot();
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 3);
    assert_eq!(snapshot["movements"].as_array().unwrap().len(), 5);
}

#[test]
fn movement_list_filters_and_paginates() {
    let home = ScriptHome::new();
    home.run(&["seed", "move list type=IN", "move list limit=2"])
        .success()
        .stdout(contains("Page 1/1 (2 movements)"))
        .stdout(contains("Page 1/3 (5 movements)"))
        .stdout(contains("Next page: `move list page=2`"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = ScriptHome::new();
    home.run(&["dashbord"])
        .success()
        .stdout(contains("Unknown command `dashbord`"))
        .stdout(contains("Suggestion: `dashboard`?"));
}

#[test]
fn invalid_arguments_print_usage_hint() {
    let home = ScriptHome::new();
    home.run(&["category add Sacs", "item add Sacs category=Sacs"])
        .success()
        .stdout(contains("missing `unit=<value>`"))
        .stdout(contains("hint: Use `help <command>` for usage details."));
}

#[test]
fn english_locale_changes_currency_layout() {
    let home = ScriptHome::new();
    home.run(&[
        "config set locale en-US",
        "config set currency usd",
        "seed",
        "dashboard",
    ])
    .success()
    .stdout(contains("currency set to USD."))
    .stdout(contains("Total value  : $183.35"));

    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"en-US\""));
    assert!(config.contains("\"USD\""));
}

#[test]
fn backup_restore_brings_back_deleted_items() {
    let home = ScriptHome::new();
    home.run(&[
        "seed",
        "backup create inventaire",
        r#"item remove "Gants nitrile""#,
        "backup list",
        "backup restore 1",
        r#"stock "Gants nitrile""#,
    ])
    .success()
    .stdout(contains("_inventaire` created."))
    .stdout(contains("restored."))
    .stdout(contains("Gants nitrile: 0 boîte"));

    assert_eq!(home.snapshot()["items"].as_array().unwrap().len(), 4);
}

#[test]
fn export_writes_dated_file_into_directory() {
    let home = ScriptHome::new();
    let out = assert_fs::TempDir::new().unwrap();
    let line = format!("export {}", out.path().display());
    home.run(&["seed", line.as_str()])
        .success()
        .stdout(contains("Inventory exported to"));

    let name = format!("fungistock-backup-{}.json", Utc::now().format("%Y-%m-%d"));
    out.child(name).assert(predicate::path::is_file());
}

#[test]
fn corrupt_data_file_starts_empty_with_warning() {
    let home = ScriptHome::new();
    std::fs::write(home.data_file(), "{ not json").unwrap();
    home.run(&["stock"])
        .success()
        .stdout(contains("snapshot is not valid JSON"))
        .stdout(contains("No items yet."));
}

#[test]
fn version_reports_build_metadata() {
    let home = ScriptHome::new();
    home.run(&["version"])
        .success()
        .stdout(contains("Fungistock"))
        .stdout(contains("Snapshot ver : v1"));
}

#[test]
fn help_lists_commands_and_details() {
    let home = ScriptHome::new();
    home.run(&["help", "help move", "# comment lines are skipped", "help nothing"])
        .success()
        .stdout(contains("=== Available commands ==="))
        .stdout(contains("dashboard"))
        .stdout(contains("move add <IN|OUT|USE|LOST|DON> <item> <qty>"))
        .stdout(contains("Unknown command `nothing`"));
}
