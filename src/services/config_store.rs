// Configuration Storage Service
// Handles config file read/write, version backup and environment overrides

use crate::services::detection::tuning::Tuning;
use crate::services::text_processor::DEFAULT_CHUNK_CHARS;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_VERSION: &str = "1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed for {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub neural: NeuralConfig,
    #[serde(default, deserialize_with = "deserialize_tuning")]
    pub tuning: Tuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            neural: NeuralConfig::default(),
            tuning: Tuning::default(),
        }
    }
}

/// Where and how to reach the neural inference endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NeuralConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub language_model_url: Option<String>,
    #[serde(default)]
    pub embedding_url: Option<String>,
    #[serde(default = "default_language_model")]
    pub language_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language_model_url: None,
            embedding_url: None,
            language_model: default_language_model(),
            embedding_model: default_embedding_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            chunk_chars: default_chunk_chars(),
        }
    }
}

impl NeuralConfig {
    /// Apply `TEXTPROBE_*` environment overrides on top of file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_value("TEXTPROBE_LM_URL") {
            self.language_model_url = Some(url);
        }
        if let Some(url) = env_value("TEXTPROBE_EMBEDDING_URL") {
            self.embedding_url = Some(url);
        }
        if let Some(key) = env_value("TEXTPROBE_NEURAL_API_KEY") {
            self.api_key = Some(key);
        }
        if matches!(
            env_value("TEXTPROBE_DISABLE_NEURAL").as_deref(),
            Some("1") | Some("true") | Some("TRUE")
        ) {
            self.enabled = false;
        }
        self
    }

    /// Both endpoints configured and the backend not switched off
    pub fn is_configured(&self) -> bool {
        let has = |url: &Option<String>| url.as_deref().map_or(false, |u| !u.trim().is_empty());
        self.enabled && has(&self.language_model_url) && has(&self.embedding_url)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn deserialize_tuning<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tuning, D::Error> {
    let overrides = Value::deserialize(deserializer)?;
    Tuning::from_overrides(overrides).map_err(serde::de::Error::custom)
}

fn default_version() -> String { CONFIG_VERSION.to_string() }
fn default_true() -> bool { true }
fn default_language_model() -> String { "gpt2".to_string() }
fn default_embedding_model() -> String { "all-MiniLM-L6-v2".to_string() }
fn default_timeout_secs() -> u64 { 80 }
fn default_chunk_chars() -> usize { DEFAULT_CHUNK_CHARS }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Store rooted at an explicit config file path
    pub fn at_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("textprobe"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;

        fs::write(&self.config_file, content).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(|source| ConfigError::Io {
            path: backup_dir.clone(),
            source,
        })?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(|source| ConfigError::Io {
            path: backup_file.clone(),
            source,
        })?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|source| ConfigError::Io {
                path: backup_dir.to_path_buf(),
                source,
            })?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first; the timestamped name breaks ties within one mtime tick
        entries.sort_by_key(|e| {
            (
                e.metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
                e.file_name(),
            )
        });

        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}
