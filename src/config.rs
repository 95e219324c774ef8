// ABOUTME: Configuration module for the his-poster application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::capture::CaptureConfig;
use crate::errors::{DeckError, Result};
use crate::pptx::PptxConfig;
use crate::server::ServeConfig;
use std::env;
use std::path::PathBuf;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub browser_path: Option<String>,
    pub ready_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub output_dir: PathBuf,
    pub embed_backgrounds: bool,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_path: None,
            ready_timeout_ms: 30000, // 30 seconds
            settle_delay_ms: 500,
            output_dir: PathBuf::from("."),
            embed_backgrounds: false,
            port: 8080,
        }
    }
}

/// Parse a numeric setting, falling back to `default` when it is unset or blank.
/// A value that is present but does not parse is a configuration error.
pub fn parse_setting<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            DeckError::ConfigError(format!("Invalid value for {}: {}", name, raw))
        }),
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let browser_path = env::var("BROWSER_PATH").ok().filter(|s| !s.is_empty());
        let ready_timeout_ms = parse_setting(
            "READY_TIMEOUT_MS",
            env::var("READY_TIMEOUT_MS").ok(),
            defaults.ready_timeout_ms,
        )?;
        let settle_delay_ms = parse_setting(
            "SETTLE_DELAY_MS",
            env::var("SETTLE_DELAY_MS").ok(),
            defaults.settle_delay_ms,
        )?;
        let output_dir = env::var("OUTPUT_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let embed_backgrounds = env::var("EMBED_BACKGROUNDS")
            .ok()
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.embed_backgrounds);
        let port = parse_setting("PORT", env::var("PORT").ok(), defaults.port)?;

        Ok(Self {
            browser_path,
            ready_timeout_ms,
            settle_delay_ms,
            output_dir,
            embed_backgrounds,
            port,
        })
    }

    /// Get a capture configuration with defaults from this config
    pub fn get_capture_config(
        &self,
        timeout_ms: Option<u64>,
        settle_delay_ms: Option<u64>,
    ) -> CaptureConfig {
        CaptureConfig {
            browser_path: self.browser_path.clone(),
            ready_timeout_ms: timeout_ms.unwrap_or(self.ready_timeout_ms),
            settle_delay_ms: settle_delay_ms.unwrap_or(self.settle_delay_ms),
            ..CaptureConfig::default()
        }
    }

    /// Get a PPTX configuration with defaults
    pub fn get_pptx_config(&self, title: Option<String>, embed_backgrounds: bool) -> PptxConfig {
        let defaults = PptxConfig::default();
        PptxConfig {
            title: title.unwrap_or(defaults.title),
            embed_backgrounds: embed_backgrounds || self.embed_backgrounds,
            ..defaults
        }
    }

    /// Get a viewer server configuration
    pub fn get_serve_config(&self, host: Option<String>, port: Option<u16>) -> ServeConfig {
        let defaults = ServeConfig::default();
        ServeConfig {
            host: host.unwrap_or(defaults.host),
            port: port.unwrap_or(self.port),
            capture: self.get_capture_config(None, None),
            pptx: self.get_pptx_config(None, false),
        }
    }

    /// Resolve an output directory, preferring an explicit one
    pub fn output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(|| self.output_dir.clone())
    }
}
