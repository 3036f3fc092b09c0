use fungi_core::{MovementFilter, PageRequest};
use fungi_domain::{Category, Supplier};

use crate::cli::args::short_id;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::formatting::{Column, Table};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const LATEST_MOVEMENTS: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Show stock totals, value and low-stock alerts",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "stock",
            "Show current stock levels",
            "stock [item]",
            cmd_stock,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let formatter = context.formatter();
    let summary = context.repository.summary(context.config.low_stock_preview);

    output_section("Dashboard");
    io::print_info(format!("  Items        : {}", summary.item_count));
    io::print_info(format!(
        "  Categories   : {}",
        context.repository.list::<Category>().len()
    ));
    io::print_info(format!(
        "  Suppliers    : {}",
        context.repository.list::<Supplier>().len()
    ));
    io::print_info(format!(
        "  Total stock  : {}",
        formatter.quantity(summary.total_stock, "").trim_end()
    ));
    io::print_info(format!(
        "  Total value  : {}",
        formatter.amount(summary.total_value)
    ));
    io::print_info(format!("  Low stock    : {}", summary.low_stock_count));

    if summary.low_stock.is_empty() {
        io::print_success("No item is below its threshold.");
    } else {
        output_section("Low stock");
        let mut table = Table::new(vec![
            Column::left("Item").truncated(28),
            Column::right("Stock"),
            Column::right("Threshold"),
        ]);
        for entry in &summary.low_stock {
            table.push(vec![
                entry.name.clone(),
                formatter.quantity(entry.stock, &entry.unit),
                formatter.quantity(entry.threshold, &entry.unit),
            ]);
        }
        io::print_warning(format!(
            "{} item(s) below threshold",
            summary.low_stock_count
        ));
        io::print_info(table.render());
    }

    let latest = context.repository.movement_history(
        &MovementFilter::default(),
        PageRequest::new(1, LATEST_MOVEMENTS)?,
    )?;
    if !latest.entries.is_empty() {
        output_section("Latest movements");
        for movement in latest.entries {
            io::print_info(format!(
                "  {}  {:<12} {:>10}  {}",
                formatter.date(movement.date),
                movement.kind.label(),
                formatter.quantity(movement.signed_qty(), &movement.unit),
                context.item_name(&movement.item_id)
            ));
        }
    }
    Ok(())
}

fn cmd_stock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let formatter = context.formatter();
    if !args.is_empty() {
        let item = context.find_item(&args.join(" "))?;
        let stock = context.repository.current_stock(&item.id);
        io::print_info(format!(
            "{}: {}",
            item.name,
            formatter.quantity(stock, &item.unit)
        ));
        if stock < item.low_stock_threshold {
            io::print_warning(format!(
                "Below threshold of {}.",
                formatter.quantity(item.low_stock_threshold, &item.unit)
            ));
        }
        return Ok(());
    }

    let levels = context.repository.stock_levels();
    if levels.is_empty() {
        io::print_info("No items yet. Add one with `item add`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        Column::left("Id"),
        Column::left("Item").truncated(28),
        Column::right("Stock"),
        Column::right("Threshold"),
        Column::left(""),
    ]);
    for level in levels {
        table.push(vec![
            short_id(&level.item_id).to_string(),
            level.name,
            formatter.quantity(level.stock, &level.unit),
            formatter.quantity(level.threshold, &level.unit),
            if level.low { "LOW".into() } else { String::new() },
        ]);
    }
    io::print_info(table.render());
    Ok(())
}
