//! JSON configuration file.
//!
//! One config per installation, by default at `~/.config/husk/config.json`:
//!
//! ```json
//! { "root": "/home/me/.husk", "db": "/home/me/.husk/husk.db", "default_context": "notes" }
//! ```
//!
//! `default_context` is only present while a virtual context is pinned with
//! `husk context set`. The config is loaded once per invocation and passed
//! explicitly to whatever needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HuskError, HuskResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the store (`<install dir>/.husk`).
    pub root: PathBuf,
    /// Path of the SQLite store.
    pub db: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_context: Option<String>,
}

impl Config {
    pub fn new(root: PathBuf, db: PathBuf) -> Self {
        Self {
            root,
            db,
            default_context: None,
        }
    }
}

/// `~/.config/husk`
pub fn config_dir() -> HuskResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("husk"))
        .ok_or_else(|| HuskError::Config("cannot determine home directory".to_string()))
}

/// `~/.config/husk/config.json`
pub fn default_config_path() -> HuskResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load_config(path: &Path) -> HuskResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| HuskError::io(path, e))?;

    let config: Config = serde_json::from_str(&content)
        .map_err(|e| HuskError::Config(format!("{}: {}", path.display(), e)))?;

    if config.db.as_os_str().is_empty() {
        return Err(HuskError::Config("db must not be empty".to_string()));
    }
    if config.default_context.as_deref() == Some("") {
        return Err(HuskError::Config(
            "default_context must not be empty".to_string(),
        ));
    }

    Ok(config)
}

/// Write the config file.
///
/// Without `force` this refuses to overwrite an existing file and requires
/// the grandparent directory (`~/.config`) to already exist; the `husk`
/// directory itself is created. With `force` all missing directories are
/// created and an existing file is replaced.
pub fn save_config(path: &Path, config: &Config, force: bool) -> HuskResult<()> {
    if path.exists() && !force {
        return Err(HuskError::AlreadyInitialized(path.to_path_buf()));
    }

    if let Some(dir) = path.parent() {
        if !force {
            if let Some(base) = dir.parent() {
                if !base.as_os_str().is_empty() && !base.exists() {
                    return Err(HuskError::Config(format!(
                        "{} does not exist",
                        base.display()
                    )));
                }
            }
        }
        std::fs::create_dir_all(dir).map_err(|e| HuskError::io(dir, e))?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| HuskError::Config(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| HuskError::io(path, e))
}

/// Pin `name` as the process-wide context in the config at `path`.
pub fn set_default_context(path: &Path, name: &str) -> HuskResult<Config> {
    let mut config = load_config(path)?;
    config.default_context = Some(name.to_string());
    save_config(path, &config, true)?;
    Ok(config)
}

/// Drop any pinned context. A config without one is left as is.
pub fn unset_default_context(path: &Path) -> HuskResult<Config> {
    let mut config = load_config(path)?;
    if config.default_context.take().is_some() {
        save_config(path, &config, true)?;
    }
    Ok(config)
}
