//! Global schedule configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TAGS;
use crate::error::{ScheduleError, ScheduleResult};

static DEFAULT_DATA_PATH: &str = "~/.schedule";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Configuration at ~/.config/schedule/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// Directory holding the JSON records (events, tags, accounts).
    #[serde(default = "default_data_path")]
    pub data_dir: PathBuf,

    /// Tags a user starts with before adding their own.
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            data_dir: default_data_path(),
            default_tags: default_tags(),
        }
    }
}

impl ScheduleConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("schedule");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> ScheduleResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let tags = DEFAULT_TAGS
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(", ");

        let contents = format!(
            "\
# schedule configuration

# Where events, tags and accounts are stored:
# data_dir = \"{}\"

# Tags every new user starts with:
# default_tags = [{}]
",
            DEFAULT_DATA_PATH, tags
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScheduleError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn to_toml(&self) -> ScheduleResult<String> {
        toml::to_string_pretty(self).map_err(|e| ScheduleError::Config(e.to_string()))
    }
}
