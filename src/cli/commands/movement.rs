use fungi_core::{MovementFilter, PageRequest};
use fungi_domain::{EntityId, Movement, MovementEntry, MovementKind, MovementPatch};

use super::{split_subcommand, unknown_subcommand};
use crate::cli::args::{is_clear_word, parse_datetime, parse_number, short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table, ValueFormatter};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "move <add|edit|list|remove>";
const ADD_USAGE: &str = "move add <IN|OUT|USE|LOST|DON> <item> <qty> [supplier=] [price=] [reason=] [date=]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "move",
        "Record and review stock movements",
        USAGE,
        cmd_move,
    )
    .with_subcommands(&["add", "edit", "list", "remove"])
    .with_details(&[
        ADD_USAGE,
        "move edit <id> [type=] [item=] [qty=] [supplier=|none] [price=|none] [reason=|none] [date=]",
        "move list [type=] [item=] [category=] [supplier=] [page=] [limit=]",
        "move remove <id>",
        "IN and DON add stock; OUT, USE and LOST remove it.",
        "Dates: YYYY-MM-DD or YYYY-MM-DDTHH:MM (UTC).",
    ])]
}

fn cmd_move(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    let parsed = ParsedArgs::parse(rest);
    match sub.as_str() {
        "add" => add(context, &parsed),
        "edit" => edit(context, &parsed),
        "list" | "ls" => list(context, &parsed),
        "remove" | "rm" => remove(context, &parsed),
        other => Err(unknown_subcommand("move", other)),
    }
}

fn parse_kind(raw: &str) -> Result<MovementKind, CommandError> {
    raw.parse::<MovementKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn add(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.ensure_known(&["supplier", "price", "reason", "date"])?;
    let kind = parse_kind(parsed.require_positional(0, ADD_USAGE)?)?;
    let item_id = context.find_item(parsed.require_positional(1, ADD_USAGE)?)?.id.clone();
    let qty = parse_number("qty", parsed.require_positional(2, ADD_USAGE)?)?;

    let mut entry = MovementEntry::new(kind, item_id.clone(), qty);
    if let Some(date) = parsed.get("date") {
        entry = entry.dated(parse_datetime(date)?);
    }
    if let Some(supplier) = parsed.get("supplier") {
        entry = entry.from_supplier(context.find_supplier(supplier)?.id.clone());
    }
    if let Some(price) = parsed.number("price")? {
        entry = entry.at_price(price);
    }
    if let Some(reason) = parsed.text("reason") {
        entry = entry.because(reason);
    }

    let movement = context.repository.record_movement(entry)?;
    let formatter = context.formatter();
    let stock = context.repository.current_stock(&item_id);
    io::print_success(format!(
        "{} {} recorded for `{}` ({}). Stock now {}.",
        movement.kind.label(),
        formatter.quantity(movement.qty, &movement.unit),
        context.item_name(&item_id),
        short_id(&movement.id),
        formatter.quantity(stock, &movement.unit)
    ));
    warn_if_low(context, &item_id);
    Ok(())
}

fn edit(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "move edit <id> [field=value]...")?;
    parsed.ensure_known(&["type", "item", "qty", "supplier", "price", "reason", "date"])?;
    if !parsed.has_options() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one field=value".into(),
        ));
    }
    let id = context.find_movement(reference)?.id.clone();

    let supplier_id = match parsed.get("supplier") {
        None => None,
        Some(raw) if is_clear_word(raw) => Some(None),
        Some(raw) => Some(Some(context.find_supplier(raw)?.id.clone())),
    };
    let patch = MovementPatch {
        date: parsed.get("date").map(parse_datetime).transpose()?,
        kind: parsed.get("type").map(parse_kind).transpose()?,
        item_id: match parsed.get("item") {
            Some(item) => Some(context.find_item(item)?.id.clone()),
            None => None,
        },
        supplier_id,
        qty: parsed.number("qty")?,
        unit_price: parsed.clearable_number("price")?,
        reason: parsed.clearable_text("reason"),
        ..MovementPatch::default()
    };

    let movement = context.repository.update_movement(&id, patch)?;
    io::print_success(format!("Movement {} updated.", short_id(&movement.id)));
    warn_if_low(context, &movement.item_id);
    Ok(())
}

fn list(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.ensure_known(&["type", "item", "category", "supplier", "page", "limit"])?;
    let filter = MovementFilter {
        kind: parsed.get("type").map(parse_kind).transpose()?,
        item_id: parsed
            .get("item")
            .map(|item| context.find_item(item).map(|item| item.id.clone()))
            .transpose()?,
        category_id: parsed
            .get("category")
            .map(|category| {
                context
                    .find_category(category)
                    .map(|category| category.id.clone())
            })
            .transpose()?,
        supplier_id: parsed
            .get("supplier")
            .map(|supplier| {
                context
                    .find_supplier(supplier)
                    .map(|supplier| supplier.id.clone())
            })
            .transpose()?,
    };
    let request = PageRequest::new(
        parsed.count("page")?.unwrap_or(1),
        parsed.count("limit")?.unwrap_or(context.config.page_size),
    )?;

    let formatter = context.formatter();
    let page = context.repository.movement_history(&filter, request)?;
    if page.total == 0 {
        io::print_info("No movements match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::left("Id"),
        Column::left("Date"),
        Column::left("Type"),
        Column::left("Item").truncated(24),
        Column::right("Qty"),
        Column::right("Unit price"),
        Column::left("Supplier").truncated(18),
        Column::left("Reason").truncated(24),
    ]);
    for movement in &page.entries {
        table.push(movement_row(context, movement, &formatter));
    }
    io::print_info(table.render());
    io::print_info(format!(
        "Page {}/{} ({} movements)",
        page.page,
        page.total_pages().max(1),
        page.total
    ));
    if page.has_next() {
        io::print_hint(format!("Next page: `move list page={}`", page.page + 1));
    }
    Ok(())
}

fn movement_row(
    context: &ShellContext,
    movement: &Movement,
    formatter: &ValueFormatter,
) -> Vec<String> {
    let supplier = movement
        .supplier_id
        .as_ref()
        .and_then(|id| context.repository.inventory().supplier(id))
        .map(|supplier| supplier.name.clone())
        .unwrap_or_default();
    vec![
        short_id(&movement.id).to_string(),
        formatter.date(movement.date),
        movement.kind.code().to_string(),
        context.item_name(&movement.item_id),
        formatter.quantity(movement.signed_qty(), &movement.unit),
        formatter.optional_amount(movement.unit_price),
        supplier,
        movement.reason.clone().unwrap_or_default(),
    ]
}

fn remove(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "move remove <id>")?;
    let movement = context.find_movement(reference)?;
    let (id, item_id) = (movement.id.clone(), movement.item_id.clone());
    if !context.confirm_destructive(&format!("Delete movement {}?", short_id(&id)))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.repository.delete::<Movement>(&id)?;
    io::print_success(format!("Movement {} deleted.", short_id(&id)));
    warn_if_low(context, &item_id);
    Ok(())
}

fn warn_if_low(context: &ShellContext, item_id: &EntityId) {
    let Some(item) = context.repository.inventory().item(item_id) else {
        return;
    };
    let stock = context.repository.current_stock(item_id);
    if stock < item.low_stock_threshold {
        let formatter = context.formatter();
        io::print_warning(format!(
            "`{}` is low: {} left (threshold {}).",
            item.name,
            formatter.quantity(stock, &item.unit),
            formatter.quantity(item.low_stock_threshold, &item.unit)
        ));
    }
}
