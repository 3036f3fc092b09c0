pub mod category;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod item;
pub mod movement;
pub mod supplier;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(dashboard::definitions());
    commands.extend(item::definitions());
    commands.extend(movement::definitions());
    commands.extend(category::definitions());
    commands.extend(supplier::definitions());
    commands.extend(data::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Splits `args` into a lowercased subcommand and the rest.
pub(crate) fn split_subcommand<'a>(
    args: &'a [&'a str],
    usage: &str,
) -> Result<(String, &'a [&'a str]), CommandError> {
    match args.split_first() {
        Some((first, rest)) => Ok((first.to_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

pub(crate) fn unknown_subcommand(command: &str, sub: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown {command} subcommand `{sub}`"))
}
