use fungi_core::MovementFilter;
use fungi_domain::{Displayable, Supplier, SupplierDraft, SupplierPatch};

use super::{split_subcommand, unknown_subcommand};
use crate::cli::args::{short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "supplier <add|edit|list|remove>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new("supplier", "Manage suppliers", USAGE, cmd_supplier)
        .with_subcommands(&["add", "edit", "list", "remove"])
        .with_details(&[
            "supplier add <name> [contact=<text>] [notes=<text>]",
            "supplier edit <supplier> [name=] [contact=|none] [notes=|none]",
            "supplier list",
            "supplier remove <supplier>",
        ])]
}

fn cmd_supplier(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    let parsed = ParsedArgs::parse(rest);
    match sub.as_str() {
        "add" => add(context, &parsed),
        "edit" => edit(context, &parsed),
        "list" | "ls" => list(context),
        "remove" | "rm" => remove(context, &parsed),
        other => Err(unknown_subcommand("supplier", other)),
    }
}

fn add(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.ensure_known(&["contact", "notes"])?;
    let name = parsed
        .rest_joined(0)
        .ok_or_else(|| CommandError::InvalidArguments("usage: supplier add <name>".into()))?;
    let mut draft = SupplierDraft::new(name);
    if let Some(contact) = parsed.text("contact") {
        draft = draft.with_contact(contact);
    }
    if let Some(notes) = parsed.text("notes") {
        draft = draft.with_notes(notes);
    }
    let supplier = context.repository.add::<Supplier>(draft)?;
    io::print_success(format!(
        "Supplier `{}` added ({}).",
        supplier.display_label(),
        short_id(&supplier.id)
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "supplier edit <supplier> [field=value]...")?;
    parsed.ensure_known(&["name", "contact", "notes"])?;
    let id = context.find_supplier(reference)?.id.clone();
    let patch = SupplierPatch {
        name: parsed.text("name"),
        contact: parsed.clearable_text("contact"),
        notes: parsed.clearable_text("notes"),
    };
    let supplier = context.repository.update::<Supplier>(&id, patch)?;
    io::print_success(format!("Supplier `{}` updated.", supplier.name));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let suppliers = context.repository.list::<Supplier>();
    if suppliers.is_empty() {
        io::print_info("No suppliers yet. Add one with `supplier add <name>`.");
        return Ok(());
    }
    let movements = &context.repository.inventory().movements;
    let mut table = Table::new(vec![
        Column::left("Id"),
        Column::left("Name").truncated(28),
        Column::left("Contact").truncated(32),
        Column::right("Movements"),
    ]);
    for supplier in suppliers {
        let filter = MovementFilter {
            supplier_id: Some(supplier.id.clone()),
            ..MovementFilter::default()
        };
        let count = movements.iter().filter(|m| filter.matches(m)).count();
        table.push(vec![
            short_id(&supplier.id).to_string(),
            supplier.name.clone(),
            supplier.contact.clone().unwrap_or_default(),
            count.to_string(),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn remove(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "supplier remove <supplier>")?;
    let supplier = context.find_supplier(reference)?;
    let (id, name) = (supplier.id.clone(), supplier.name.clone());
    if !context.confirm_destructive(&format!("Delete supplier `{name}`?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.repository.delete::<Supplier>(&id)?;
    io::print_success(format!("Supplier `{name}` deleted."));
    Ok(())
}
