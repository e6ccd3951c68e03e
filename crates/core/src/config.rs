//! Client configuration.
//!
//! Resolution priority, highest first:
//! 1. explicit value from the command line
//! 2. `CADENCE_API_URL` environment variable (if non-empty)
//! 3. config file (`$CADENCE_CONFIG`, else `<config dir>/cadence/config.toml`)
//! 4. built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "CADENCE_API_URL";

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "CADENCE_CONFIG";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/tasks";

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the task service; paths like `tasks/` are joined onto it
    pub api_url: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(raw) = std::env::var(CONFIG_PATH_ENV)
            && !raw.trim().is_empty()
        {
            return Some(PathBuf::from(raw.trim()));
        }
        dirs::config_dir().map(|dir| dir.join("cadence").join("config.toml"))
    }

    /// Load a config file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the file exists but cannot be read or
    /// is not valid TOML for this schema.
    pub fn from_file(path: &Path) -> ApiResult<Option<Self>> {
        if !path.exists() {
            debug!(file = %path.display(), "config file not found");
            return Ok(None);
        }

        let raw = fs::read_to_string(path).map_err(|e| ApiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = toml::from_str::<Config>(&raw).map_err(|e| ApiError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;

        info!(file = %path.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Resolve the effective configuration.
    ///
    /// `file` overrides the default config file location.
    pub fn resolve(cli_api_url: Option<String>, file: Option<&Path>) -> ApiResult<Self> {
        let path = file.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?.unwrap_or_default(),
            None => Self::default(),
        };

        if let Ok(env_url) = std::env::var(API_URL_ENV)
            && !env_url.trim().is_empty()
        {
            config.api_url = env_url.trim().to_string();
        }

        if let Some(url) = cli_api_url {
            config.api_url = url;
        }

        config.sanitize();
        debug!(api_url = %config.api_url, timeout_secs = config.timeout_secs, "resolved config");
        Ok(config)
    }

    fn sanitize(&mut self) {
        if self.api_url.trim().is_empty() {
            self.api_url = DEFAULT_API_URL.to_string();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
    }
}
