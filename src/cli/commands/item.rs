use fungi_core::{MovementFilter, PageRequest};
use fungi_domain::{Item, ItemDraft, ItemPatch, Timestamped};

use super::{split_subcommand, unknown_subcommand};
use crate::cli::args::{short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "item <add|edit|list|show|remove>";
const ITEM_OPTIONS: [&str; 6] = ["name", "category", "unit", "threshold", "price", "notes"];
const RECENT_MOVEMENTS: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new("item", "Manage stocked items", USAGE, cmd_item)
        .with_subcommands(&["add", "edit", "list", "show", "remove"])
        .with_details(&[
            "item add <name> category=<category> unit=<unit> [threshold=<n>] [price=<n>] [notes=<text>]",
            "item edit <item> [name=] [category=] [unit=] [threshold=] [price=|none] [notes=|none]",
            "item list [category=<category>]",
            "item show <item>",
            "item remove <item>   (movements are kept)",
        ])]
}

fn cmd_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    let parsed = ParsedArgs::parse(rest);
    match sub.as_str() {
        "add" => add(context, &parsed),
        "edit" => edit(context, &parsed),
        "list" | "ls" => list(context, &parsed),
        "show" => show(context, &parsed),
        "remove" | "rm" => remove(context, &parsed),
        other => Err(unknown_subcommand("item", other)),
    }
}

fn add(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.ensure_known(&ITEM_OPTIONS[1..])?;
    let name = parsed.rest_joined(0).ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: item add <name> category=<category> unit=<unit>".into(),
        )
    })?;
    let category_id = context.find_category(parsed.require("category")?)?.id.clone();
    let unit = parsed.require("unit")?;

    let mut draft = ItemDraft::new(name, category_id, unit);
    if let Some(threshold) = parsed.number("threshold")? {
        draft = draft.with_threshold(threshold);
    }
    if let Some(price) = parsed.number("price")? {
        draft = draft.with_price(price);
    }
    if let Some(notes) = parsed.text("notes") {
        draft = draft.with_notes(notes);
    }

    let item = context.repository.add::<Item>(draft)?;
    io::print_success(format!("Item `{}` added ({}).", item.name, short_id(&item.id)));
    Ok(())
}

fn edit(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "item edit <item> [field=value]...")?;
    parsed.ensure_known(&ITEM_OPTIONS)?;
    if !parsed.has_options() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one field=value".into(),
        ));
    }
    let id = context.find_item(reference)?.id.clone();
    let category_id = match parsed.get("category") {
        Some(category) => Some(context.find_category(category)?.id.clone()),
        None => None,
    };

    let patch = ItemPatch {
        name: parsed.text("name"),
        category_id,
        unit: parsed.text("unit"),
        low_stock_threshold: parsed.number("threshold")?,
        default_unit_price: parsed.clearable_number("price")?,
        notes: parsed.clearable_text("notes"),
    };
    let item = context.repository.update::<Item>(&id, patch)?;
    io::print_success(format!("Item `{}` updated.", item.name));
    Ok(())
}

fn list(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.ensure_known(&["category"])?;
    let category_id = match parsed.get("category") {
        Some(category) => Some(context.find_category(category)?.id.clone()),
        None => None,
    };

    let formatter = context.formatter();
    let inventory = context.repository.inventory();
    let mut table = Table::new(vec![
        Column::left("Id"),
        Column::left("Name").truncated(28),
        Column::left("Category").truncated(20),
        Column::right("Stock"),
        Column::right("Threshold"),
        Column::right("Unit price"),
        Column::left(""),
    ]);
    for level in context.repository.stock_levels() {
        let Some(item) = inventory.item(&level.item_id) else {
            continue;
        };
        if category_id.as_ref().is_some_and(|id| *id != item.category_id) {
            continue;
        }
        let category = inventory
            .category(&item.category_id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| "?".into());
        table.push(vec![
            short_id(&item.id).to_string(),
            item.name.clone(),
            category,
            formatter.quantity(level.stock, &level.unit),
            formatter.quantity(level.threshold, &level.unit),
            formatter.optional_amount(item.default_unit_price),
            if level.low { "LOW".into() } else { String::new() },
        ]);
    }

    if table.is_empty() {
        io::print_info("No items to show.");
    } else {
        io::print_info(table.render());
    }
    Ok(())
}

fn show(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "item show <item>")?;
    let item = context.find_item(reference)?;
    let formatter = context.formatter();
    let inventory = context.repository.inventory();
    let stock = context.repository.current_stock(&item.id);

    output_section(&item.name);
    io::print_info(format!("  Id         : {}", item.id));
    io::print_info(format!(
        "  Category   : {}",
        inventory
            .category(&item.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("(missing)")
    ));
    io::print_info(format!("  Stock      : {}", formatter.quantity(stock, &item.unit)));
    io::print_info(format!(
        "  Threshold  : {}",
        formatter.quantity(item.low_stock_threshold, &item.unit)
    ));
    io::print_info(format!(
        "  Unit price : {}",
        formatter.optional_amount(item.default_unit_price)
    ));
    io::print_info(format!(
        "  Value      : {}",
        formatter.amount(stock * item.valuation_price())
    ));
    if let Some(notes) = &item.notes {
        io::print_info(format!("  Notes      : {notes}"));
    }
    io::print_info(format!(
        "  Modified   : {}",
        formatter.date(item.last_modified())
    ));
    if stock < item.low_stock_threshold {
        io::print_warning("Stock is below the threshold.");
    }

    let filter = MovementFilter {
        item_id: Some(item.id.clone()),
        ..MovementFilter::default()
    };
    let recent = context
        .repository
        .movement_history(&filter, PageRequest::new(1, RECENT_MOVEMENTS)?)?;
    if recent.total > 0 {
        io::print_info(format!("  Latest movements ({} total):", recent.total));
        for movement in recent.entries {
            io::print_info(format!(
                "    {}  {:<4} {}",
                formatter.date(movement.date),
                movement.kind.code(),
                formatter.quantity(movement.signed_qty(), &movement.unit)
            ));
        }
    }
    Ok(())
}

fn remove(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "item remove <item>")?;
    let item = context.find_item(reference)?;
    let (id, name) = (item.id.clone(), item.name.clone());
    if !context.confirm_destructive(&format!("Delete item `{name}`? Its movements are kept."))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.repository.delete::<Item>(&id)?;
    io::print_success(format!("Item `{name}` deleted."));
    Ok(())
}
