//! src/config.rs
//! ============================================================================
//! # Config: Widget Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://openlibrary.org/search.json";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Remote lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the search endpoint
    pub endpoint: String,

    /// Name of the query-string parameter carrying the query
    pub query_param: String,

    /// Quiet period required before a query fires
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,

    /// Upper bound for a single request, connect included
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query_param: "q".to_string(),
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("typeahead/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Texts shown by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub label: String,

    pub placeholder: String,

    pub loading_text: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            label: "Search".to_string(),
            placeholder: "Start typing here".to_string(),
            loading_text: "Loading...".to_string(),
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` still takes precedence
    pub level: String,

    pub log_dir: PathBuf,

    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "typeahead".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads config from the platform config dir, or creates it with defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/typeahead/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading config from {}", path.display());
            Ok(Self::load_from(&path).await?)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Reads and validates a config file at an explicit path.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|source| AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;
        let cfg: Self = toml::from_str(&text)?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path).await?;
        Ok(())
    }

    /// Saves config to an explicit path, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Rejects values that would make the widget misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.search.debounce.is_zero() {
            return Err(AppError::invalid_config(
                "search.debounce",
                "must be greater than zero",
            ));
        }

        if self.search.query_param.trim().is_empty() {
            return Err(AppError::invalid_config(
                "search.query_param",
                "must not be empty",
            ));
        }

        self.endpoint_url()?;
        Ok(())
    }

    /// Parsed endpoint URL; only http(s) endpoints are accepted.
    pub fn endpoint_url(&self) -> Result<Url, AppError> {
        let url = Url::parse(&self.search.endpoint)
            .map_err(|e| AppError::invalid_endpoint(&self.search.endpoint, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::invalid_endpoint(
                &self.search.endpoint,
                format!("unsupported scheme '{other}'"),
            )),
        }
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the config directory (without filename).
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "typeahead", "typeahead")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}
