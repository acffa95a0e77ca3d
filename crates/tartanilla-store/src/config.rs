//! TOML configuration for the store and the callers built on it.
//!
//! ```toml
//! base_url = "https://api.example.com/api"
//! timeout_secs = 10
//! retry_timeout_secs = 30
//! catalog = "driver"
//! ```
//!
//! Every key is optional. `TARTANILLA_API_URL` overrides `base_url`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tartanilla_schedule::slot::CatalogKind;

use crate::error::{Result, StoreError};
use crate::retry::RetryPolicy;

pub const API_URL_ENV: &str = "TARTANILLA_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_timeout_secs: u64,
    pub catalog: CatalogKind,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 10,
            retry_timeout_secs: 30,
            catalog: CatalogKind::Driver,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: StoreConfig =
            toml::from_str(raw).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load from `path`, or from the platform config directory when `None`.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(p) if p.exists() => {
                log::debug!("loading config from {}", p.display());
                let raw = std::fs::read_to_string(&p).map_err(|e| {
                    StoreError::Config(format!("failed to read {}: {}", p.display(), e))
                })?;
                Self::from_toml_str(&raw)?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }

    /// `<config dir>/tartanilla/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("ph", "tartanilla", "tartanilla")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            retry_timeout: Duration::from_secs(self.retry_timeout_secs),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".into()));
        }
        if self.retry_timeout_secs < self.timeout_secs {
            return Err(StoreError::Config(
                "retry_timeout_secs must not be shorter than timeout_secs".into(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(self)
    }
}
