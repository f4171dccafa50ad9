use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const SETTINGS_FILE: &str = "ragvault.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Url,
    /// Zero disables the per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn with_api_url(mut self, raw: &str) -> anyhow::Result<Self> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn parse_api_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid api url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api url '{raw}' must use http or https");
    }
    Ok(url)
}

/// Defaults, then `ragvault.toml`, then `RAGVAULT_*` environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_cfg: FileSettings =
            toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = parse_api_url(&v)?;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("RAGVAULT_API_URL") {
        settings.api_url = parse_api_url(&v)?;
    }
    if let Some(v) = env("RAGVAULT_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("RAGVAULT_REQUEST_TIMEOUT_SECS must be an integer, got '{v}'"))?;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
