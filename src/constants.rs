//! Application constants and configuration

pub const APP_NAME: &str = "Trading App";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend the client talks to unless settings or the environment say otherwise
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Overrides `api_base_url` from settings.json when set
pub const API_URL_ENV: &str = "TRADING_APP_API_URL";

/// Oldest entries are dropped from the activity log past this size
pub const MAX_ACTIVITY_ENTRIES: usize = 200;
