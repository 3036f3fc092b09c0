//! Filesystem layout of a Fungistock home directory.

use std::path::PathBuf;

use fungi_config::{default_base_dir, Config};
use fungi_storage_json::StoragePaths;

pub const DATA_FILE_NAME: &str = "fungistock.json";
pub const BACKUP_DIR_NAME: &str = "backups";

/// Resolved locations for configuration, data and backups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub base_dir: PathBuf,
    pub data_file: PathBuf,
    pub backups_dir: PathBuf,
}

impl AppPaths {
    /// Places the data file under `config.data_dir` when set, else under `base_dir`.
    pub fn resolve(base_dir: PathBuf, config: &Config) -> Self {
        let data_dir = config.resolve_data_dir(&base_dir);
        Self {
            data_file: data_dir.join(DATA_FILE_NAME),
            backups_dir: data_dir.join(BACKUP_DIR_NAME),
            base_dir,
        }
    }

    pub fn default_base() -> PathBuf {
        default_base_dir()
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths {
            data_file: self.data_file.clone(),
            backup_root: self.backups_dir.clone(),
        }
    }
}
