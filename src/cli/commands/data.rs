use std::path::{Path, PathBuf};

use chrono::Utc;
use fungi_core::{demo_inventory, export_file_name, BackupInfo};

use super::{split_subcommand, unknown_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const BACKUP_USAGE: &str = "backup <create|list|restore>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write the inventory to a JSON file",
            "export [directory|file.json]",
            cmd_export,
        )
        .with_details(&[
            "Without a path the file is written to the current directory.",
            "A directory receives fungistock-backup-YYYY-MM-DD.json.",
        ]),
        CommandEntry::new(
            "seed",
            "Replace the inventory with demo data",
            "seed",
            cmd_seed,
        ),
        CommandEntry::new("backup", "Create, list and restore backups", BACKUP_USAGE, cmd_backup)
            .with_subcommands(&["create", "list", "restore"])
            .with_details(&[
                "backup create [note]",
                "backup list",
                "backup restore <number|name>   (number from `backup list`)",
            ]),
    ]
}

fn export_target(arg: Option<&str>) -> PathBuf {
    let file_name = export_file_name(Utc::now().date_naive());
    match arg {
        None => PathBuf::from(file_name),
        Some(raw) => {
            let path = Path::new(raw);
            let is_file = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_file {
                path.to_path_buf()
            } else {
                path.join(file_name)
            }
        }
    }
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let joined = args.join(" ");
    let target = export_target((!joined.is_empty()).then_some(joined.as_str()));
    context.repository.export_to(&target)?;
    io::print_success(format!("Inventory exported to {}.", target.display()));
    Ok(())
}

fn cmd_seed(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.repository.inventory().is_empty()
        && !context.confirm_destructive("Replace the whole inventory with demo data?")?
    {
        io::print_info("Seeding cancelled.");
        return Ok(());
    }
    context.repository.replace_all(demo_inventory(Utc::now()))?;
    let inventory = context.repository.inventory();
    io::print_success(format!(
        "Demo data loaded: {} categories, {} suppliers, {} items, {} movements.",
        inventory.categories.len(),
        inventory.suppliers.len(),
        inventory.items.len(),
        inventory.movements.len()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, BACKUP_USAGE)?;
    match sub.as_str() {
        "create" => {
            let note = rest.join(" ");
            let note = (!note.trim().is_empty()).then_some(note.as_str());
            let backup = context.repository.backup(note)?;
            io::print_success(format!("Backup `{}` created.", backup.id));
            Ok(())
        }
        "list" => list_backups(context),
        "restore" => restore_backup(context, rest),
        other => Err(unknown_subcommand("backup", other)),
    }
}

fn list_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.repository.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet. Create one with `backup create [note]`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("Name"),
        Column::left("Created"),
    ]);
    for (index, backup) in backups.iter().enumerate() {
        table.push(vec![
            (index + 1).to_string(),
            backup.id.clone(),
            backup.created_at.clone(),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

/// Numbers refer to positions in `backup list`; anything else matches names.
fn pick_backup(backups: Vec<BackupInfo>, reference: &str) -> Result<BackupInfo, CommandError> {
    if let Ok(number) = reference.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| backups.get(index).cloned())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "backup number {number} is out of range (1-{})",
                    backups.len()
                ))
            });
    }
    backups
        .into_iter()
        .find(|backup| backup.id == reference || backup.id.contains(reference))
        .ok_or_else(|| CommandError::Message(format!("No backup matches `{reference}`.")))
}

fn restore_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: backup restore <number|name>".into())
    })?;
    let backup = pick_backup(context.repository.list_backups()?, reference)?;
    if !context.confirm_destructive(&format!(
        "Restore `{}`? Unsaved differences in the current data will be lost.",
        backup.id
    ))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    let warnings = context.repository.restore(&backup)?;
    for warning in &warnings {
        io::print_warning(warning);
    }
    io::print_success(format!("Backup `{}` restored.", backup.id));
    Ok(())
}
