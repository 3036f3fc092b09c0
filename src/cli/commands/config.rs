use fungi_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config [show|set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        USAGE,
        cmd_config,
    )
    .with_subcommands(&["show", "set"])
    .with_details(&[
        "Keys: locale, currency, data_dir, backup_retention, page_size,",
        "      low_stock_preview, ui_color_enabled",
        "config set data_dir default   (back to the home directory)",
    ])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set(context, &key, value.trim())
        }
        other => Err(super::unknown_subcommand("config", other)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in Config::KEYS {
        let value = context.config.get_value(key)?;
        io::print_info(format!("  {:<18}: {}", key, value));
    }
    io::print_info(format!(
        "  {:<18}: {}",
        "data file",
        context.paths.data_file.display()
    ));
    io::print_info(format!(
        "  {:<18}: {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let previous = context.config.clone();
    context.config.set_value(key, value)?;
    if let Err(err) = context.save_config() {
        context.config = previous;
        return Err(err);
    }
    io::apply_config(&context.config);

    let storage_changed = context.config.data_dir != previous.data_dir
        || context.config.backup_retention != previous.backup_retention;
    if storage_changed {
        context.reopen_repository()?;
    }

    io::print_success(format!(
        "{} set to {}.",
        key,
        context.config.get_value(key)?
    ));
    Ok(())
}
