use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use fungi_core::{
    storage::{BackupInfo, InventoryStore, LoadReport, SNAPSHOT_VERSION},
    CoreError,
};
use fungi_domain::{Category, Inventory, Item, Movement, Supplier};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

const JSON_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "fungistock";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Where the live snapshot and its backups live on disk.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_file: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence for the inventory snapshot and its backups.
#[derive(Debug, Clone)]
pub struct JsonInventoryStore {
    data_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonInventoryStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        if let Some(parent) = paths.data_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            data_file: paths.data_file,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    fn write_backup_file(
        &self,
        inventory: &Inventory,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        let now = Utc::now();
        let timestamp = now.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = self.vacant_backup_name(&stem);
        let path = self.backups_dir.join(&file_name);
        write_atomic(&path, &serialize_snapshot(inventory, now)?)?;
        tracing::info!(backup = %file_name, "backup written");
        self.prune_backups()?;
        Ok(BackupInfo {
            id: file_name,
            created_at: now.format("%Y-%m-%d %H:%M").to_string(),
            path,
        })
    }

    /// `<stem>.json`, or `<stem>_2.json`, `<stem>_3.json`... when taken.
    fn vacant_backup_name(&self, stem: &str) -> String {
        let mut file_name = format!("{stem}.{JSON_EXTENSION}");
        let mut copy = 2;
        while self.backups_dir.join(&file_name).exists() {
            file_name = format!("{stem}_{copy}.{JSON_EXTENSION}");
            copy += 1;
        }
        file_name
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            tracing::debug!(backup = %entry.id, "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl InventoryStore for JsonInventoryStore {
    fn load(&self) -> LoadReport {
        if !self.data_file.exists() {
            return LoadReport::empty();
        }
        match fs::read_to_string(&self.data_file) {
            Ok(data) => decode_snapshot(&data),
            Err(err) => {
                LoadReport::empty().with_warning(format!(
                    "could not read {}: {}",
                    self.data_file.display(),
                    err
                ))
            }
        }
    }

    fn save(&self, inventory: &Inventory) -> Result<(), CoreError> {
        save_snapshot_to_path(inventory, &self.data_file)?;
        tracing::debug!(path = %self.data_file.display(), "snapshot saved");
        Ok(())
    }

    fn export_to_path(&self, inventory: &Inventory, path: &Path) -> Result<(), CoreError> {
        save_snapshot_to_path(inventory, path)
    }

    fn backup(&self, inventory: &Inventory, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        self.write_backup_file(inventory, note)
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created) = parse_backup_timestamp(file_name) else {
                continue;
            };
            entries.push((
                created,
                BackupInfo {
                    id: file_name.to_string(),
                    created_at: created.format("%Y-%m-%d %H:%M").to_string(),
                    path: path.clone(),
                },
            ));
        }
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.id.cmp(&a.1.id)));
        Ok(entries.into_iter().map(|(_, info)| info).collect())
    }

    fn restore_backup(&self, backup: &BackupInfo) -> Result<LoadReport, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Persistence(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let data = fs::read_to_string(&backup.path)?;
        let tmp = tmp_path(&self.data_file);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &self.data_file)?;
        tracing::info!(backup = %backup.id, "backup restored");
        Ok(self.load())
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    inventory: &'a Inventory,
}

/// Writes a full snapshot to `path` through a temporary file and a rename.
pub fn save_snapshot_to_path(inventory: &Inventory, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_snapshot(inventory, Utc::now())?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Decodes snapshot text, keeping every record that parses.
///
/// A non-object document yields an empty inventory; a missing or non-array
/// collection yields an empty collection; records that fail to decode are
/// dropped. Each recovery is reported as a warning.
pub fn decode_snapshot(data: &str) -> LoadReport {
    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "snapshot is not valid JSON");
            return LoadReport::empty().with_warning(format!("snapshot is not valid JSON: {err}"));
        }
    };
    let Value::Object(map) = value else {
        return LoadReport::empty().with_warning("snapshot is not a JSON object");
    };

    let mut warnings = Vec::new();
    let version = map
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok());
    if let Some(found) = version {
        if found > SNAPSHOT_VERSION {
            warnings.push(format!(
                "snapshot version {found} is newer than supported version {SNAPSHOT_VERSION}"
            ));
        }
    }
    let saved_at = map
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc));

    let inventory = Inventory {
        items: decode_collection::<Item>(map.get("items"), "items", &mut warnings),
        categories: decode_collection::<Category>(
            map.get("categories"),
            "categories",
            &mut warnings,
        ),
        suppliers: decode_collection::<Supplier>(map.get("suppliers"), "suppliers", &mut warnings),
        movements: decode_collection::<Movement>(map.get("movements"), "movements", &mut warnings),
    };
    for warning in &warnings {
        tracing::warn!(%warning, "lenient snapshot load");
    }
    LoadReport {
        inventory,
        warnings,
        version,
        saved_at,
    }
}

fn decode_collection<T: DeserializeOwned>(
    value: Option<&Value>,
    field: &str,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    let records = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(records)) => records,
        Some(_) => {
            warnings.push(format!("`{field}` is not an array; starting empty"));
            return Vec::new();
        }
    };
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match T::deserialize(record) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warnings.push(format!("dropped {field}[{index}]: {err}"));
                None
            }
        })
        .collect()
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the `YYYYMMDD_HHMM` stamp that follows the backup prefix.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", JSON_EXTENSION))?;
    let rest = stem.strip_prefix(&format!("{}_", BACKUP_PREFIX))?;
    let mut segments = rest.split('_');
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn serialize_snapshot(inventory: &Inventory, timestamp: DateTime<Utc>) -> Result<String, CoreError> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        timestamp,
        inventory,
    };
    serde_json::to_string_pretty(&snapshot).map_err(|err| CoreError::Persistence(err.to_string()))
}
