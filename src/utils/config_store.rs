use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml::{Table, Value};
use tracing::debug;

const SECTION: &str = "USERINFO";
const CONFIG_FILE_NAME: &str = "config.toml";

/// The settings the wizard remembers between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CurrentDevice,
    SourceFolder,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::CurrentDevice, ConfigKey::SourceFolder];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::CurrentDevice => "current_device",
            ConfigKey::SourceFolder => "source_folder",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup failures, carried inside `anyhow::Error` so callers can downcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSection,
    MissingKey(ConfigKey),
    Malformed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingSection => write!(f, "config has no [{}] section", SECTION),
            ConfigError::MissingKey(key) => write!(f, "config has no `{}` key", key),
            ConfigError::Malformed(reason) => write!(f, "config file is malformed: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Flat key-value settings persisted as a single `[USERINFO]` section.
///
/// Every call opens and closes the file, so a read always sees the latest write.
/// There is no locking: the last writer wins.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store in the per-user config directory
    pub fn open_default() -> Result<Self> {
        let project_dirs = super::project_dirs()?;
        let config_dir = project_dirs.config_dir();

        // Create the config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
        }

        Ok(Self::at(config_dir.join(CONFIG_FILE_NAME)))
    }

    /// Use an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the section with empty values for any key that is missing.
    /// Values already present are left alone.
    pub fn ensure_initialized(&self) -> Result<()> {
        let file_exists = self.path.exists();
        let mut table = self.load()?;
        let section = section_mut(&mut table)?;

        let mut changed = false;
        for key in ConfigKey::ALL {
            if !section.contains_key(key.as_str()) {
                section.insert(key.as_str().to_string(), Value::String(String::new()));
                changed = true;
            }
        }

        if changed || !file_exists {
            debug!("Seeding config file {}", self.path.display());
            self.save(&table)?;
        }

        Ok(())
    }

    /// Read the persisted value for `key`
    pub fn get(&self, key: ConfigKey) -> Result<String> {
        let table = self.load()?;

        let section = match table.get(SECTION) {
            Some(Value::Table(section)) => section,
            Some(_) => {
                return Err(ConfigError::Malformed(format!("[{}] is not a section", SECTION)).into());
            }
            None => return Err(ConfigError::MissingSection.into()),
        };

        match section.get(key.as_str()) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(ConfigError::Malformed(format!("`{}` is not a string", key)).into()),
            None => Err(ConfigError::MissingKey(key).into()),
        }
    }

    /// Overwrite one key and rewrite the whole file
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        let mut table = self.load()?;
        section_mut(&mut table)?.insert(key.as_str().to_string(), Value::String(value.to_string()));
        self.save(&table)?;

        debug!("Config {} set to {:?}", key, value);
        Ok(())
    }

    /// Load the whole mapping; a missing file reads as empty
    fn load(&self) -> Result<Table> {
        if !self.path.exists() {
            return Ok(Table::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {}", self.path.display()))?;

        content
            .parse::<Table>()
            .map_err(|e| ConfigError::Malformed(e.to_string()).into())
    }

    fn save(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }

        let content = toml::to_string(table).context("Failed to serialize config to TOML")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file {}", self.path.display()))
    }
}

fn section_mut(table: &mut Table) -> Result<&mut Table> {
    match table
        .entry(SECTION.to_string())
        .or_insert(Value::Table(Table::new()))
    {
        Value::Table(section) => Ok(section),
        _ => Err(ConfigError::Malformed(format!("[{}] is not a section", SECTION)).into()),
    }
}
