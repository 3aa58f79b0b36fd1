//! Configuration file support for Liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn outbox_path(&self) -> PathBuf {
        self.data_dir.join("outbox.jsonl")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.csv")
    }
}

/// Profile fallbacks
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_body_weight_kg")]
    pub default_body_weight_kg: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_body_weight_kg: default_body_weight_kg(),
        }
    }
}

/// Longest accepted post-save delay (ten minutes)
pub const MAX_POST_SAVE_DELAY_MS: u64 = 600_000;

/// Session behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay before the post-save follow-up fires
    #[serde(default = "default_post_save_delay_ms")]
    pub post_save_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            post_save_delay_ms: default_post_save_delay_ms(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("liftlog")
}

fn default_body_weight_kg() -> f64 {
    crate::profile::DEFAULT_BODY_WEIGHT_KG
}

fn default_post_save_delay_ms() -> u64 {
    1500
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let weight = self.profile.default_body_weight_kg;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::Config(format!(
                "default_body_weight_kg must be positive, got {}",
                weight
            )));
        }

        let delay = self.session.post_save_delay_ms;
        if delay > MAX_POST_SAVE_DELAY_MS {
            return Err(Error::Config(format!(
                "post_save_delay_ms must be at most {}, got {}",
                MAX_POST_SAVE_DELAY_MS, delay
            )));
        }
        Ok(())
    }
}
