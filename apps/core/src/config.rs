use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::action_executor::Programs;
use crate::snapshot::{default_snapshot_path, DEFAULT_MAX_AGE_HOURS};

pub const APP_DIR_NAME: &str = "vesslo-core";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid json5 in {}: {source}", path.display())]
    Json5 {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_path: PathBuf,
    pub stale_after_hours: i64,
    pub brew_program: String,
    pub open_program: String,
    pub clipboard_program: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let programs = Programs::default();
        Self {
            data_path: default_snapshot_path(),
            stale_after_hours: DEFAULT_MAX_AGE_HOURS,
            brew_program: programs.brew,
            open_program: programs.open,
            clipboard_program: programs.clipboard,
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn programs(&self) -> Programs {
        Programs {
            brew: self.brew_program.clone(),
            open: self.open_program.clone(),
            clipboard: self.clipboard_program.clone(),
        }
    }

    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.stale_after_hours)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.data_path.as_os_str().is_empty() {
        return Err("data_path is required".into());
    }

    if !(1..=720).contains(&cfg.stale_after_hours) {
        return Err("stale_after_hours must be between 1 and 720".into());
    }

    for (name, value) in [
        ("brew_program", &cfg.brew_program),
        ("open_program", &cfg.open_program),
        ("clipboard_program", &cfg.clipboard_program),
    ] {
        if value.trim().is_empty() {
            return Err(format!("{name} is required"));
        }
    }

    Ok(())
}

/// Loads the config at `path` (or the default location). A missing file
/// yields defaults; `.json`/`.json5` files are parsed as JSON5, anything else
/// as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    let raw = match std::fs::read_to_string(&config_path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config {
                config_path,
                ..Config::default()
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            });
        }
    };

    let mut cfg = parse(&raw, &config_path)?;
    cfg.config_path = config_path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    let encoded = toml::to_string_pretty(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"));

    if is_json {
        json5::from_str(raw).map_err(|source| ConfigError::Json5 {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
