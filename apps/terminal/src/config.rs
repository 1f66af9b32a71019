use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub default_num_jobs: u32,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            poll_interval_ms: 1000,
            default_num_jobs: 5,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.server_url)
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        if self.poll_interval_ms == 0 {
            bail!("poll interval must be greater than zero");
        }
        Ok(())
    }
}

pub fn load_settings(config_path: &Path) -> (Settings, Option<toml::de::Error>) {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the optional config file, then environment overrides.
///
/// A config file that exists but does not parse is skipped; its error is
/// returned for the caller to log once tracing is up.
pub fn load_settings_with(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> (Settings, Option<toml::de::Error>) {
    let mut settings = Settings::default();
    let mut file_error = None;

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_value(&file_cfg, "server_url") {
                    settings.server_url = v;
                }
                if let Some(v) = file_value(&file_cfg, "poll_interval_ms").and_then(parse_num) {
                    settings.poll_interval_ms = v;
                }
                if let Some(v) = file_value(&file_cfg, "default_num_jobs").and_then(parse_num) {
                    settings.default_num_jobs = v;
                }
                if let Some(v) = file_value(&file_cfg, "log_filter") {
                    settings.log_filter = v;
                }
            }
            Err(error) => file_error = Some(error),
        }
    }

    if let Some(v) = env("PIPELINE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__POLL_INTERVAL_MS").and_then(parse_num) {
        settings.poll_interval_ms = v;
    }
    if let Some(v) = env("APP__DEFAULT_NUM_JOBS").and_then(parse_num) {
        settings.default_num_jobs = v;
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    (settings, file_error)
}

fn file_value(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<String> {
    match file_cfg.get(key)? {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        _ => None,
    }
}

fn parse_num<T: std::str::FromStr>(raw: String) -> Option<T> {
    raw.trim().parse().ok()
}

pub fn normalize_server_url(raw_server_url: &str) -> String {
    let raw_server_url = raw_server_url.trim();

    if raw_server_url.is_empty() {
        return Settings::default().server_url;
    }

    let with_scheme = if raw_server_url.contains("://") {
        raw_server_url.to_string()
    } else {
        format!("http://{raw_server_url}")
    };

    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
