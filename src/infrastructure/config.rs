//! Configuration infrastructure
//!
//! Settings for the storefront being scraped, the fetch behavior, and the
//! export file locations. Everything that used to be a module-level
//! constant in earlier tooling (site origin, delays, file names) lives here
//! as an injected value so the exporter can be reused across storefronts.
//!
//! Configuration is loaded from an optional JSON file next to the working
//! directory; a missing file means defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storefront being scraped
    pub site: SiteConfig,

    /// Network fetch behavior
    pub fetch: FetchConfig,

    /// Input/output file locations
    pub export: ExportConfig,
}

/// Storefront-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin used to absolutize site-relative image URLs
    pub origin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.papadontpreach.com".to_string(),
        }
    }
}

/// Network fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Fixed pause between consecutive requests in milliseconds.
    /// This is pacing to avoid overloading the source server, not a
    /// rate limiter with backoff.
    pub request_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            timeout_seconds: 30,
            request_delay_ms: 1000,
        }
    }
}

/// Input and output file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File listing product URLs, one per line; blank lines and `#`
    /// comments are skipped
    pub links_file: PathBuf,

    /// Feed file the importer consumes
    pub output_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            links_file: PathBuf::from("links.txt"),
            output_file: PathBuf::from("Papa_Dont_Preach_output.csv"),
        }
    }
}

/// Loads and saves the application configuration file
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    const DEFAULT_CONFIG_FILE: &'static str = "pdp_feed_config.json";

    /// Manager for the default configuration file in the working directory
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(Self::DEFAULT_CONFIG_FILE),
        }
    }

    /// Manager for an explicit configuration path
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist. Unknown or missing fields take their default values.
    pub async fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            debug!(
                "No configuration file at {:?}, using defaults",
                self.config_path
            );
            return Ok(AppConfig::default());
        }

        let raw = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read config file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", self.config_path))?;

        info!("Loaded configuration from {:?}", self.config_path);
        Ok(config)
    }

    /// Write the configuration back as pretty-printed JSON
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        let raw = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, raw)
            .await
            .with_context(|| format!("Failed to write config file {:?}", self.config_path))?;

        info!("Saved configuration to {:?}", self.config_path);
        Ok(())
    }
}
