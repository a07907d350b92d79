use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

/// Encoding the poller asks the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Versioned JSON (`GET /api/chat/sync`).
    #[default]
    Json,
    /// Legacy tab/newline stream (`POST /chat/get.php`).
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the sync endpoint listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Base URL the poller talks to.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Game name shown in the welcome banner.
    #[serde(default = "default_game_title")]
    pub game_title: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_path() -> String {
    "data/chat.db".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_display_name() -> String {
    crate::storage::models::DEFAULT_USER.to_string()
}

fn default_game_title() -> String {
    "A3P".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: default_database_path(),
            server_url: default_server_url(),
            poll_interval_ms: default_poll_interval_ms(),
            display_name: default_display_name(),
            wire_format: WireFormat::default(),
            game_title: default_game_title(),
        }
    }
}

impl AppConfig {
    /// Poll period, never shorter than 100 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
