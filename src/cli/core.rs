//! Shell state, dispatch and the helpers command handlers share.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use fungi_config::{Config, ConfigError, ConfigManager};
use fungi_core::{CoreError, Repository};
use fungi_domain::{Category, EntityId, EntityKind, Item, Movement, Supplier};
use fungi_storage_json::JsonInventoryStore;
use strsim::levenshtein;
use thiserror::Error;

pub use crate::errors::CliError;

use super::args;
use super::commands;
use super::formatting::ValueFormatter;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
use crate::utils::paths::AppPaths;

const PROMPT: &str = "fungistock> ";
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub repository: Repository,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub paths: AppPaths,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, AppPaths::default_base())
    }

    /// Loads config and inventory from `base_dir`, printing any load warnings.
    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let paths = AppPaths::resolve(base_dir, &config);
        let (repository, warnings) = open_repository(&paths, &config)?;
        report_load(&warnings);

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }

        tracing::debug!(
            data_file = %paths.data_file.display(),
            ?mode,
            "shell context ready"
        );

        Ok(Self {
            mode,
            registry,
            repository,
            config,
            config_manager,
            paths,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        PROMPT.to_string()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn completion_table(&self) -> Vec<(&'static str, &'static [&'static str])> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.subcommands))
            .collect()
    }

    pub(crate) fn formatter(&self) -> ValueFormatter {
        ValueFormatter::from_config(&self.config)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= SUGGESTION_DISTANCE {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    /// Asks before destructive operations; script mode always proceeds.
    pub(crate) fn confirm_destructive(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match &err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                self.print_error(message);
                self.print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::ReferentialIntegrity { .. }) => {
                self.print_error(&err.to_string());
                self.print_hint("Move or delete those items first.");
            }
            CommandError::Core(CoreError::Persistence(_)) => {
                self.print_error(&err.to_string());
                self.print_hint("The change is kept for this session; check the data directory.");
            }
            CommandError::Core(CoreError::NotFound { kind, .. }) => {
                self.print_error(&err.to_string());
                self.print_hint(&format!("Use `{} list` to see what exists.", list_command(*kind)));
            }
            _ => self.print_error(&err.to_string()),
        }
        Ok(())
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn find_item(&self, reference: &str) -> Result<&Item, CommandError> {
        args::resolve(
            self.repository.list::<Item>(),
            reference,
            EntityKind::Item,
            |item| Some(item.name.as_str()),
        )
    }

    pub(crate) fn find_category(&self, reference: &str) -> Result<&Category, CommandError> {
        args::resolve(
            self.repository.list::<Category>(),
            reference,
            EntityKind::Category,
            |category| Some(category.name.as_str()),
        )
    }

    pub(crate) fn find_supplier(&self, reference: &str) -> Result<&Supplier, CommandError> {
        args::resolve(
            self.repository.list::<Supplier>(),
            reference,
            EntityKind::Supplier,
            |supplier| Some(supplier.name.as_str()),
        )
    }

    /// Movements have no name; they are found by id or id prefix only.
    pub(crate) fn find_movement(&self, reference: &str) -> Result<&Movement, CommandError> {
        args::resolve(
            self.repository.list::<Movement>(),
            reference,
            EntityKind::Movement,
            |_| None,
        )
    }

    pub(crate) fn item_name(&self, item_id: &EntityId) -> String {
        self.repository
            .inventory()
            .item(item_id)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| format!("(deleted {})", args::short_id(item_id)))
    }

    pub(crate) fn save_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        tracing::info!(path = %self.config_manager.config_path().display(), "config saved");
        Ok(())
    }

    /// Re-resolves paths from the current config and reopens the inventory.
    pub(crate) fn reopen_repository(&mut self) -> CommandResult {
        let paths = AppPaths::resolve(self.paths.base_dir.clone(), &self.config);
        let (repository, warnings) =
            open_repository(&paths, &self.config).map_err(|err| match err {
                CliError::Core(core) => CommandError::Core(core),
                other => CommandError::Message(other.to_string()),
            })?;
        report_load(&warnings);
        self.paths = paths;
        self.repository = repository;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }
}

fn open_repository(paths: &AppPaths, config: &Config) -> Result<(Repository, Vec<String>), CliError> {
    let store = JsonInventoryStore::with_retention(paths.storage_paths(), config.backup_retention)?;
    Ok(Repository::open(Box::new(store)))
}

fn report_load(warnings: &[String]) {
    for warning in warnings {
        cli_io::print_warning(warning);
    }
}

fn list_command(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Item => "item",
        EntityKind::Category => "category",
        EntityKind::Supplier => "supplier",
        EntityKind::Movement => "move",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fungi_domain::MovementKind;
    use tempfile::TempDir;

    fn context() -> (ShellContext, TempDir) {
        let dir = TempDir::new().unwrap();
        let context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        (context, dir)
    }

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            if let Err(err) = context.process_line(line) {
                panic!("`{line}` failed: {err}");
            }
        }
    }

    #[test]
    fn unknown_command_is_not_an_error() {
        let (mut context, _dir) = context();
        assert_eq!(
            context.process_line("dashbord").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(context.last_command.as_deref(), Some("dashbord"));
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _dir) = context();
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn records_movements_through_commands() {
        let (mut context, _dir) = context();
        run(
            &mut context,
            &[
                "category add Substrats",
                "item add \"Pellets paille bio\" category=Substrats unit=kg threshold=50 price=0.85",
                "move add IN \"Pellets paille bio\" 200",
                "move add use \"Pellets paille bio\" 45",
            ],
        );
        let item = context.find_item("pellets paille bio").unwrap().id.clone();
        assert_eq!(context.repository.current_stock(&item), 155.0);
        let kinds: Vec<MovementKind> = context
            .repository
            .list::<Movement>()
            .iter()
            .map(|movement| movement.kind)
            .collect();
        assert_eq!(kinds, vec![MovementKind::In, MovementKind::Use]);
    }

    #[test]
    fn bad_arguments_surface_as_errors() {
        let (mut context, _dir) = context();
        let err = context.process_line("item add Sacs unit=pcs").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));

        context.process_line("category add Sacs").unwrap();
        let err = context
            .process_line("item add Sacs category=Sacs unit=pcs threshold=abc")
            .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn config_change_of_data_dir_reopens_inventory() {
        let (mut context, dir) = context();
        context.process_line("category add Filtres").unwrap();
        let elsewhere = dir.path().join("elsewhere");
        let line = format!("config set data_dir {}", elsewhere.display());
        context.process_line(&line).unwrap();

        assert_eq!(context.paths.data_file, elsewhere.join("fungistock.json"));
        assert!(context.repository.list::<Category>().is_empty());
    }
}
