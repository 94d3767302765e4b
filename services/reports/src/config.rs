use serde::Deserialize;

use classnote_core::config::Config;

use crate::domain::types::Locale;

/// Reports service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ReportsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `REPORTS_PORT`.
    #[serde(default = "default_port")]
    pub reports_port: u16,
    /// Firebase project that owns the app's push credentials.
    pub fcm_project_id: String,
    /// OAuth2 access token with the `firebase.messaging` scope.
    pub fcm_access_token: String,
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,
    /// Concurrent FCM requests within one batch.
    #[serde(default = "default_fcm_concurrency")]
    pub fcm_concurrency: usize,
    #[serde(default = "default_fcm_timeout_secs")]
    pub fcm_timeout_secs: u64,
    /// Language of notification text (`ja` or `en`).
    #[serde(default)]
    pub notify_locale: Locale,
    /// Events fanned out at the same time.
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,
    /// Capacity of the channel between ingestion and fan-out.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Config for ReportsConfig {}

fn default_port() -> u16 {
    3114
}

fn default_fcm_base_url() -> String {
    "https://fcm.googleapis.com".to_owned()
}

fn default_fcm_concurrency() -> usize {
    16
}

fn default_fcm_timeout_secs() -> u64 {
    10
}

fn default_fanout_concurrency() -> usize {
    4
}

fn default_event_buffer() -> usize {
    1024
}
