mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path, str::FromStr};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the relay configuration.
///
/// The YAML file named by `CONFIG_PATH` is read first; when the variable is
/// unset and `config.yaml` does not exist, built-in defaults are used.
/// Environment overrides are applied on top and the result is validated.
pub async fn load() -> Result<Config> {
    let explicit = env::var("CONFIG_PATH").ok();
    let config_path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    let mut config = load_file(config_path, explicit.is_some()).await?;
    apply_overrides(&mut config, |key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

/// Reads a YAML config file. A missing file is only an error when `required` is set.
pub async fn load_file(config_path: &str, required: bool) -> Result<Config> {
    if !required && !Path::new(config_path).exists() {
        debug!("No config file at {}, using defaults", config_path);
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Applies `RELAY_*` and `PORT` overrides looked up through `lookup`.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("RELAY_BACKEND_URL") {
        config.backend.base_url = url;
    }
    if let Some(prefix) = lookup("RELAY_API_PREFIX") {
        config.backend.api_prefix = prefix;
    }
    if let Some(v) = lookup("RELAY_FN_INDEX") {
        config.backend.fn_index = parse_var("RELAY_FN_INDEX", &v)?;
    }
    if let Some(v) = lookup("RELAY_TRIGGER_ID") {
        config.backend.trigger_id = parse_var("RELAY_TRIGGER_ID", &v)?;
    }
    if let Some(v) = lookup("RELAY_JOIN_TIMEOUT_SECS") {
        config.backend.join_timeout_secs = parse_var("RELAY_JOIN_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("RELAY_STREAM_TIMEOUT_SECS") {
        config.backend.stream_timeout_secs = parse_var("RELAY_STREAM_TIMEOUT_SECS", &v)?;
    }
    if let Some(host) = lookup("RELAY_HOST") {
        config.server.host = host;
    }
    if let Some(v) = lookup("PORT") {
        config.server.port = parse_var("PORT", &v)?;
    }
    Ok(())
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {key}: '{value}'")))
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::config(format!(
                "Backend base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.backend.join_timeout_secs == 0 || self.backend.stream_timeout_secs == 0 {
            return Err(Error::config("Backend timeouts must be greater than zero"));
        }
        Ok(())
    }
}
