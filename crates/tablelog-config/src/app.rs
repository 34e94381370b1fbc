//! Application configuration.
//!
//! `AppConfig` is read from an optional TOML file. The application id is the
//! one value that may also come from the environment: the hosting platform
//! injects `DATABRICKS_APPS_APP_ID`, which wins over the file.
//!
//! Precedence for `app_id`:
//!
//! 1. `DATABRICKS_APPS_APP_ID`, when set and not blank
//! 2. `app_id` from the file, when not blank
//! 3. `"local-dev"`

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    record::LOCAL_APP_ID,
};
use tablelog_core::EmitterSettings;

use crate::sinks::SinkSpec;

/// Environment variable carrying the hosting platform's application id.
pub const APP_ID_ENV: &str = "DATABRICKS_APPS_APP_ID";

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_sinks() -> Vec<SinkSpec> {
    vec![SinkSpec::Tracing]
}

/// Top-level configuration document.
///
/// Every key is optional; an empty document is the default configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application id used when the environment provides none.
    #[serde(default)]
    pub app_id: Option<String>,

    /// Send a short notice to the UI surface after every audit record.
    #[serde(default)]
    pub surface_notices: bool,

    /// `tracing-subscriber` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Audit line destinations. Defaults to a single tracing sink.
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            surface_notices: false,
            log_filter: default_log_filter(),
            sinks: default_sinks(),
        }
    }
}

impl AppConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `TablelogError::ConfigError` if the TOML is malformed, does not
    /// match `AppConfig`, or configures no usable sink.
    pub fn from_toml_str(s: &str) -> TablelogResult<Self> {
        let config: AppConfig = toml::from_str(s).map_err(|e| TablelogError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(sinks = config.sinks.len(), "configuration loaded");
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> TablelogResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TablelogError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> TablelogResult<()> {
        if self.sinks.is_empty() {
            return Err(TablelogError::ConfigError {
                reason: "at least one sink must be configured".to_string(),
            });
        }
        for sink in &self.sinks {
            if let SinkSpec::File { path } = sink {
                if path.as_os_str().is_empty() {
                    return Err(TablelogError::ConfigError {
                        reason: "file sink requires a non-empty path".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The effective application id given the environment's value.
    pub fn effective_app_id(&self, env_app_id: Option<&str>) -> String {
        resolve_app_id(env_app_id, self.app_id.as_deref())
    }

    /// Build the emitter settings for this configuration.
    pub fn emitter_settings(&self, env_app_id: Option<&str>) -> EmitterSettings {
        EmitterSettings {
            app_id: self.effective_app_id(env_app_id),
            surface_notices: self.surface_notices,
        }
    }
}

/// Pick the application id from the environment value and the file value.
pub fn resolve_app_id(env: Option<&str>, file: Option<&str>) -> String {
    [env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(LOCAL_APP_ID)
        .to_string()
}

/// Read [`APP_ID_ENV`] from the process environment.
pub fn env_app_id() -> Option<String> {
    std::env::var(APP_ID_ENV).ok()
}
