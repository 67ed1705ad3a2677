use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::currency::{Currency, ExchangeRate};
use crate::errors::SubtrackError;
use crate::utils::{app_data_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

/// Fallback USD→JPY quote used until the caller supplies a fresher one.
/// Rate retrieval is not this crate's job; the number is user-editable.
const DEFAULT_EXCHANGE_RATE: f64 = 150.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub display_currency: Currency,
    pub exchange_rate: f64,
}

impl Config {
    pub fn rate(&self) -> ExchangeRate {
        ExchangeRate::new(self.exchange_rate)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_currency: Currency::Jpy,
            exchange_rate: DEFAULT_EXCHANGE_RATE,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, SubtrackError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SubtrackError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, SubtrackError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, SubtrackError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), SubtrackError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
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

fn write_atomic(path: &Path, data: &str) -> Result<(), SubtrackError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_defaults_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("config manager");
        let config = manager.load().expect("load config");
        assert_eq!(config.display_currency, Currency::Jpy);
        assert_eq!(config.exchange_rate, DEFAULT_EXCHANGE_RATE);
    }

    #[test]
    fn save_and_reload_preferences() {
        let temp = TempDir::new().expect("temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("config manager");
        let config = Config {
            display_currency: Currency::Usd,
            exchange_rate: 147.25,
        };
        manager.save(&config).expect("save config");
        let reloaded = manager.load().expect("reload config");
        assert_eq!(reloaded.display_currency, Currency::Usd);
        assert_eq!(reloaded.exchange_rate, 147.25);
    }
}
