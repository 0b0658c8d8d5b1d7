use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_CONFIG_PATH: &str = "survey_form.toml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_url: Option<String>,
    pub request_timeout_secs: u64,
    pub copy_feedback_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    request_timeout_secs: Option<u64>,
    copy_feedback_ms: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn copy_feedback_delay(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// The configured backend endpoint, parsed. Fails when unset or not an
    /// absolute URL.
    pub fn endpoint(&self) -> Result<Url, ClientError> {
        let raw = self
            .endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ClientError::Config(
                    "backend endpoint is not configured; set SURVEY_ENDPOINT_URL or endpoint_url in survey_form.toml".to_string(),
                )
            })?;
        Url::parse(raw)
            .map_err(|err| ClientError::Config(format!("invalid backend endpoint '{raw}': {err}")))
    }

    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint_url = Some(endpoint);
        }
        self
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        if let Some(v) = file_cfg.endpoint_url {
            self.endpoint_url = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.copy_feedback_ms {
            self.copy_feedback_ms = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("SURVEY_ENDPOINT_URL") {
            self.endpoint_url = Some(v);
        }
        if let Some(v) = var("APP__ENDPOINT_URL") {
            self.endpoint_url = Some(v);
        }

        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
        if let Some(v) = var("APP__COPY_FEEDBACK_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.copy_feedback_ms = parsed;
            }
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var("SURVEY_FORM_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Defaults, then the settings file if present, then environment overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path();
    if let Ok(raw) = fs::read_to_string(&path) {
        settings
            .apply_file(&raw)
            .with_context(|| format!("failed to load settings from '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings file");
    }

    settings.apply_env(|name| std::env::var(name).ok());
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
