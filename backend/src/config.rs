//! App Configuration
//!
//! JSON file in the app data directory. A missing file means defaults; a
//! malformed one is logged and replaced by defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "cat_breeds_config.json";

/// Overrides `api_key` from the file when set
pub const API_KEY_ENV: &str = "CAT_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    /// Max entries in a similar-breeds list
    pub similar_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.thecatapi.com/v1".to_string(),
            api_key: None,
            request_timeout_secs: 15,
            similar_limit: crate::repository::DEFAULT_SIMILAR_LIMIT,
        }
    }
}

impl AppConfig {
    /// Non-empty key from the environment wins over the file
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file (if any) and apply the environment override
pub fn load_config(data_dir: &Path) -> AppConfig {
    read_config_file(&config_path(data_dir))
        .with_api_key_override(std::env::var(API_KEY_ENV).ok())
}

fn read_config_file(path: &Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return AppConfig::default(),
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring malformed config {}: {}", path.display(), e);
            AppConfig::default()
        }
    }
}

pub fn save_config(data_dir: &Path, config: &AppConfig) -> Result<(), String> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| format!("Failed to create {}: {}", data_dir.display(), e))?;
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(config_path(data_dir), json)
        .map_err(|e| format!("Failed to write config: {}", e))
}
