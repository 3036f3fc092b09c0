use fungi_domain::{Category, CategoryDraft, CategoryPatch};

use super::{split_subcommand, unknown_subcommand};
use crate::cli::args::{short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "category <add|edit|list|remove>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new("category", "Manage item categories", USAGE, cmd_category)
        .with_subcommands(&["add", "edit", "list", "remove"])
        .with_details(&[
            "category add <name>",
            "category edit <category> name=<new name>",
            "category list",
            "category remove <category>   (refused while items use it)",
        ])]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    let parsed = ParsedArgs::parse(rest);
    match sub.as_str() {
        "add" => add(context, &parsed),
        "edit" => edit(context, &parsed),
        "list" => list(context),
        "remove" | "rm" => remove(context, &parsed),
        other => Err(unknown_subcommand("category", other)),
    }
}

fn add(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let name = parsed
        .rest_joined(0)
        .ok_or_else(|| CommandError::InvalidArguments("usage: category add <name>".into()))?;
    parsed.ensure_known(&[])?;
    let category = context
        .repository
        .add::<Category>(CategoryDraft::new(name))?;
    io::print_success(format!(
        "Category `{}` added ({}).",
        category.name,
        short_id(&category.id)
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "category edit <category> name=<new name>")?;
    parsed.ensure_known(&["name"])?;
    let id = context.find_category(reference)?.id.clone();
    let name = parsed.require("name")?;
    let category = context
        .repository
        .update::<Category>(&id, CategoryPatch::rename(name))?;
    io::print_success(format!("Category renamed to `{}`.", category.name));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let usage = context.repository.category_usage();
    if usage.is_empty() {
        io::print_info("No categories yet. Add one with `category add <name>`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        Column::left("Id"),
        Column::left("Name").truncated(32),
        Column::right("Items"),
    ]);
    for entry in usage {
        table.push(vec![
            short_id(&entry.category_id).to_string(),
            entry.name,
            entry.item_count.to_string(),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn remove(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let reference = parsed.require_positional(0, "category remove <category>")?;
    let category = context.find_category(reference)?;
    let (id, name) = (category.id.clone(), category.name.clone());
    if !context.confirm_destructive(&format!("Delete category `{name}`?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.repository.delete::<Category>(&id)?;
    io::print_success(format!("Category `{name}` deleted."));
    Ok(())
}
