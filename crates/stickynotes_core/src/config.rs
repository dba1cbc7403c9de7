//! Application configuration.
//!
//! # Responsibility
//! - Describe where notes and logs live and how the store behaves.
//! - Load YAML config with a fallback chain, defaulting every field.
//!
//! # Invariants
//! - An explicitly requested config file must exist and parse.
//! - Implicit config locations that fail to load fall back to defaults.

use crate::model::note::NoteColor;
use crate::repo::note_repo::DEFAULT_STORAGE_KEY;
use crate::service::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::service::note_store::StoreOptions;
use crate::sync::SyncConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const APP_DIR_NAME: &str = "stickynotes";
const CONFIG_FILE_NAME: &str = "config.yml";
const DEFAULT_DB_FILE: &str = "stickynotes.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the notes database.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub db_file: String,
    /// Key the collection is stored under.
    pub storage_key: String,
    pub autosave_delay_ms: u64,
    pub default_color: NoteColor,
    pub log_level: String,
    /// Defaults to `<data_dir>/logs` when unset.
    pub log_dir: Option<PathBuf>,
    /// Present when the sync provider should be enabled at startup.
    pub sync: Option<SyncConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME),
            db_file: DEFAULT_DB_FILE.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            autosave_delay_ms: u64::try_from(DEFAULT_AUTOSAVE_DELAY.as_millis())
                .unwrap_or(700),
            default_color: NoteColor::default(),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            sync: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// With `explicit_path`, that file must load. Otherwise
    /// `<config_dir>/stickynotes/config.yml` is tried, then defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::load_from_file(path);
        }

        if let Some(path) = Self::default_path().filter(|path| path.exists()) {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(err) => warn!("event=config_load module=config status=fallback error={err}"),
            }
        }

        info!("event=config_load module=config status=ok source=defaults");
        Ok(Self::default())
    }

    /// Location checked when no explicit config path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(
            "event=config_load module=config status=ok source={}",
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }
        if self.db_file.trim().is_empty() {
            return Err(ConfigError::Invalid("db_file cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            autosave_delay: Duration::from_millis(self.autosave_delay_ms),
            default_color: self.default_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::model::note::NoteColor;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "default_color: blue\nautosave_delay_ms: 250").expect("write config");

        let config = AppConfig::load(Some(file.path())).expect("config should load");
        assert_eq!(config.default_color, NoteColor::Blue);
        assert_eq!(config.storage_key, "sticky-notes:v1");
        assert_eq!(
            config.store_options().autosave_delay,
            Duration::from_millis(250)
        );
        assert_eq!(config.log_dir(), config.data_dir.join("logs"));
        assert!(config.sync.is_none());
    }

    #[test]
    fn sync_section_parses_settings() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "sync:\n  settings:\n    project: demo").expect("write config");

        let config = AppConfig::load(Some(file.path())).expect("config should load");
        let sync = config.sync.expect("sync section present");
        assert_eq!(sync.settings.get("project").map(String::as_str), Some("demo"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = AppConfig::load(Some(&dir.path().join("absent.yml")))
            .expect_err("missing explicit config must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_unknown_color_and_blank_key() {
        let mut bad_color = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(bad_color, "default_color: purple").expect("write config");
        let err = AppConfig::load(Some(bad_color.path())).expect_err("purple is not a color");
        assert!(matches!(err, ConfigError::Parse { .. }));

        let mut blank_key = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(blank_key, "storage_key: '  '").expect("write config");
        let err = AppConfig::load(Some(blank_key.path())).expect_err("blank key must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
