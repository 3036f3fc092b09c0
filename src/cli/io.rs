use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};
use fungi_config::Config;

use crate::cli::core::CommandError;
use crate::cli::output::{self, OutputPreferences};

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Pushes display preferences from the config into the output layer.
pub fn apply_config(config: &Config) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled,
    });
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(theme: &ColorfulTheme, prompt: &str, default: bool) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
