//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tc_store::LogFormat;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the event log.
    pub log_path: PathBuf,
    /// Encoding used for the event log.
    pub format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_path", &self.log_path)
            .field("format", &self.format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from(".timecard"));
        Self {
            log_path: data_dir.join("timecard.txt"),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TIMECARD_LOG_PATH, TIMECARD_FORMAT
        figment = figment.merge(Env::prefixed("TIMECARD_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for the timecard.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timecard"))
}

/// Returns the directory holding the event log.
///
/// On all platforms: `~/.timecard`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".timecard"))
}
