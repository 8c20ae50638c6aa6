//! Configuration management for sift.
//!
//! Loads configuration from ${SIFT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Reveal animation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Time budget for a full reveal, in milliseconds.
    pub max_time_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            max_time_ms: Config::DEFAULT_REVEAL_MS,
        }
    }
}

/// Deferred scroll settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Delay between a growth event and the scroll to bottom, in milliseconds.
    pub delay_ms: u64,
    /// Animate scrolling instead of jumping.
    pub smooth: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            delay_ms: Config::DEFAULT_SCROLL_DELAY_MS,
            smooth: true,
        }
    }
}

/// Transcript viewer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Transcript file polling interval, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Config::DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `SIFT_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reveal: RevealConfig,
    pub scroll: ScrollConfig,
    pub viewer: ViewerConfig,
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_REVEAL_MS: u64 = 1000;
    const DEFAULT_SCROLL_DELAY_MS: u64 = 1000;
    const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
    /// Lower bound for the polling interval; anything faster just burns CPU.
    const MIN_POLL_INTERVAL_MS: u64 = 20;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// Fails if a file already exists there.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    pub fn reveal_max_time(&self) -> Duration {
        Duration::from_millis(self.reveal.max_time_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll.delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.viewer.poll_interval_ms.max(Self::MIN_POLL_INTERVAL_MS))
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for sift configuration and data directories.
    //!
    //! SIFT_HOME resolution order:
    //! 1. SIFT_HOME environment variable (if set)
    //! 2. ~/.config/sift (default)
    //! 3. ./.sift when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the sift home directory.
    pub fn sift_home() -> PathBuf {
        if let Ok(home) = std::env::var("SIFT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".sift"),
            |h| h.join(".config").join("sift"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        sift_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        sift_home().join("logs")
    }
}
