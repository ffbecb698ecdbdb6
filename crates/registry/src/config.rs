use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use opsdash_util::{config_file_path, expand_tilde};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "OPSDASH_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 5;

/// Dashboard settings read from `~/.config/opsdash/config.json`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the permission-administration API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Endpoint listing capabilities, relative to `api_base`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities_path: Option<String>,
    /// Custom navigation tree (YAML or JSON). The built-in menu is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_path: Option<String>,
    /// Lifetime of transient notifications, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_ttl_secs: Option<u64>,
}

impl DashboardConfig {
    /// Loads the config from the default location.
    ///
    /// A missing file yields defaults; an unreadable or malformed file is
    /// logged and also yields defaults.
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse dashboard config; using defaults"
                    );
                    Self::default()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Failed to read dashboard config; using defaults");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&default_config_path())
    }

    /// The custom navigation tree path with `~` expanded.
    pub fn navigation_path(&self) -> Option<PathBuf> {
        self.navigation_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(expand_tilde)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs.unwrap_or(DEFAULT_NOTIFICATION_TTL_SECS))
    }
}

/// Get the default path for the dashboard configuration file.
pub fn default_config_path() -> PathBuf {
    config_file_path(CONFIG_PATH_ENV, CONFIG_FILE_NAME)
}
