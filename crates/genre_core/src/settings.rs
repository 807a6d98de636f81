//! User settings persisted as TOML: endpoint, theme and request timeout.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://priyansu19-movie-genre-predictor.hf.space";
pub const DEFAULT_PREDICT_PATH: &str = "/predict";
pub const SETTINGS_FILE: &str = "settings.toml";
/// Environment variable overriding the configured base URL.
pub const ENDPOINT_ENV: &str = "POSTER_GENRE_ENDPOINT";

/// Look of the application window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

/// Where predictions are requested from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_PREDICT_PATH.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Joins base URL and path; only http(s) endpoints are accepted.
    pub fn url(&self) -> Result<Url, ConfigError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.path.trim().trim_start_matches('/')
        );
        let url = Url::parse(&joined).map_err(|e| ConfigError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: joined,
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Seconds before an upload is abandoned. Absent means wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub endpoint: EndpointConfig,
    /// Base URL taken from the environment. Lives for this run only and is
    /// never written back.
    #[serde(skip)]
    pub session_override: Option<String>,
}

impl Settings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Settings::load`], falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides the base URL for this run when `value` is not blank. The
    /// stored endpoint is left untouched.
    pub fn apply_endpoint_override(&mut self, value: Option<&str>) {
        if let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) {
            tracing::info!(base_url = url, "Endpoint overridden from environment");
            self.session_override = Some(url.to_string());
        }
    }

    /// Endpoint requests go to: the stored one, or the session override.
    pub fn effective_endpoint(&self) -> EndpointConfig {
        match &self.session_override {
            Some(base_url) => EndpointConfig {
                base_url: base_url.clone(),
                path: self.endpoint.path.clone(),
            },
            None => self.endpoint.clone(),
        }
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        self.effective_endpoint().url()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
