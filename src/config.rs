use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use yt_collect::{BatchLimitPolicy, YouTubeConfig};

/// Locations searched when no explicit config file is given
const CONFIG_PATHS: [&str; 2] = ["yt-insights.toml", "config/yt-insights.toml"];

/// Configuration for yt-insights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive for tracing-subscriber (e.g. "info", "yt_collect=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the first default location that exists.
    ///
    /// Falls back to defaults when nothing is found. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match CONFIG_PATHS.iter().map(PathBuf::from).find(|p| p.exists()) {
                Some(found) => Self::from_file(&found)?,
                None => {
                    tracing::debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override settings from environment variables, looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("YOUTUBE_API_KEY") {
            self.youtube = self.youtube.clone().with_api_key(Some(api_key));
        }

        if let Some(base_url) = lookup("YT_INSIGHTS_BASE_URL") {
            self.youtube = self.youtube.clone().with_base_url(base_url);
        }

        if let Some(level) = lookup("YT_INSIGHTS_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Check that commands which talk to the API can run
    pub fn validate(&self) -> Result<()> {
        match self.youtube.api_key() {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(anyhow!(
                    "YouTube API key required (set youtube.api_key or YOUTUBE_API_KEY)"
                ))
            }
        }

        if self.youtube.timeout_seconds() == 0 {
            return Err(anyhow!("youtube.timeout_seconds must be greater than 0"));
        }

        if !self.youtube.base_url().starts_with("http") {
            return Err(anyhow!(
                "youtube.base_url must be an http(s) URL, got {}",
                self.youtube.base_url()
            ));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "yt-insights configuration:\n\
            - API key: {}\n\
            - Base URL: {}\n\
            - Timeout: {}s\n\
            - Batch limit policy: {:?}\n\
            - Log level: {}",
            if self.youtube.api_key().is_some() { "set" } else { "missing" },
            self.youtube.base_url(),
            self.youtube.timeout_seconds(),
            self.youtube.batch_limit_policy(),
            self.logging.level
        )
    }

    /// Batch policy with an optional command-line override
    pub fn batch_policy(&self, lax: bool) -> BatchLimitPolicy {
        if lax {
            BatchLimitPolicy::Warn
        } else {
            self.youtube.batch_limit_policy()
        }
    }
}
