use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Browser origins allowed to call the relay directly. Empty disables CORS.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Location and routing constants of the queue-based inference backend.
///
/// `fn_index` and `trigger_id` select the remote predict function. They are
/// tied to a specific deployed revision of the backend and are not discovered
/// at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_fn_index")]
    pub fn_index: u32,
    #[serde(default = "default_trigger_id")]
    pub trigger_id: u32,
    #[serde(default = "default_join_timeout_secs")]
    pub join_timeout_secs: u64,
    #[serde(default = "default_stream_timeout_secs")]
    pub stream_timeout_secs: u64,
}

impl BackendConfig {
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix,
            path
        )
    }

    pub fn join_url(&self) -> String {
        self.endpoint("/queue/join")
    }

    pub fn data_url(&self) -> String {
        self.endpoint("/queue/data")
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }

    pub fn stream_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            fn_index: default_fn_index(),
            trigger_id: default_trigger_id(),
            join_timeout_secs: default_join_timeout_secs(),
            stream_timeout_secs: default_stream_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://hatice10-chat-emotion-ai.hf.space".to_string()
}

fn default_api_prefix() -> String {
    "/gradio_api".to_string()
}

fn default_fn_index() -> u32 {
    2
}

fn default_trigger_id() -> u32 {
    2
}

fn default_join_timeout_secs() -> u64 {
    10
}

fn default_stream_timeout_secs() -> u64 {
    60
}
