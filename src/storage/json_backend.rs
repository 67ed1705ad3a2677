use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::Subscription;
use crate::utils::{ensure_dir, subscriptions_file_in};

use super::{Result, StorageBackend};

const TMP_SUFFIX: &str = "tmp";

/// Stores the subscription array as one pretty-printed JSON file, the same
/// blob layout the original kept in browser storage.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        let file = subscriptions_file_in(&root);
        Ok(Self { root, file })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(crate::utils::app_data_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Writes the current set to an arbitrary path, for data migration.
    pub fn export_to_path(&self, subscriptions: &[Subscription], path: &Path) -> Result<()> {
        write_subscriptions(subscriptions, path)
    }

    /// Replaces the stored set wholesale with the contents of `path`.
    pub fn import_from_path(&self, path: &Path) -> Result<Vec<Subscription>> {
        let imported = read_subscriptions(path)?;
        self.save(&imported)?;
        tracing::info!(count = imported.len(), from = %path.display(), "imported subscriptions");
        Ok(imported)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Vec<Subscription>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }
        read_subscriptions(&self.file)
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        write_subscriptions(subscriptions, &self.file)
    }
}

fn read_subscriptions(path: &Path) -> Result<Vec<Subscription>> {
    let data = fs::read_to_string(path)?;
    let subscriptions: Vec<Subscription> = serde_json::from_str(&data)?;
    Ok(subscriptions)
}

fn write_subscriptions(subscriptions: &[Subscription], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(subscriptions)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
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

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
