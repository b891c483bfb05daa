//! User settings stored as settings.json in the app data directory

use crate::api::{ApiConfig, Credentials};
use crate::constants::{API_URL_ENV, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Backend
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub basic_auth: Option<Credentials>,

    // View
    pub show_activity_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            basic_auth: None,
            show_activity_log: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Client configuration, with `TRADING_APP_API_URL` taking precedence over the file
    pub fn api_config(&self) -> ApiConfig {
        self.api_config_with_override(std::env::var(API_URL_ENV).ok())
    }

    fn api_config_with_override(&self, url_override: Option<String>) -> ApiConfig {
        let base_url = match url_override.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                debug!(url = %url, "API base URL taken from environment");
                url
            }
            None => self.api_base_url.clone(),
        };
        ApiConfig {
            base_url,
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            credentials: self.basic_auth.clone(),
        }
    }
}
