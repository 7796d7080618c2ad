//! Configuration loading and root folder resolution

use crate::{Error, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default local zone for attendance timestamps
pub const DEFAULT_TIMEZONE: &str = "Africa/Cairo";

/// Default coordinates substituted when an event carries no location.
/// A documented deployment default, not a real GPS fallback.
pub const DEFAULT_LATITUDE: f64 = 29.967764;
pub const DEFAULT_LONGITUDE: f64 = 31.250816;

/// TOML configuration file contents (`~/.config/tally/config.toml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Provider OAuth2 client id
    pub client_id: Option<String>,

    /// Provider OAuth2 client secret
    pub client_secret: Option<String>,

    /// Override for the provider identity (token) endpoint base URL
    pub identity_base_url: Option<String>,

    /// Override for the provider time-tracking endpoint base URL
    pub tracking_base_url: Option<String>,

    /// Override for the provider workspace (people) endpoint base URL
    pub workspace_base_url: Option<String>,

    /// Named local zone for stored timestamps (default: Africa/Cairo)
    pub timezone: Option<String>,

    /// Default latitude when events carry no coordinates
    pub default_latitude: Option<f64>,

    /// Default longitude when events carry no coordinates
    pub default_longitude: Option<f64>,

    /// Root data folder override
    pub root_folder: Option<String>,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
    }

    /// Load the platform config file if present, otherwise defaults
    pub fn load_default() -> Self {
        match config_file_path() {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config file: {}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Resolve the configured local zone
    pub fn local_timezone(&self) -> Result<Tz> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        Tz::from_str(name).map_err(|_| Error::Config(format!("Unknown timezone: {}", name)))
    }

    /// Default event coordinates (configured or compiled default)
    pub fn default_location(&self) -> (f64, f64) {
        (
            self.default_latitude.unwrap_or(DEFAULT_LATITUDE),
            self.default_longitude.unwrap_or(DEFAULT_LONGITUDE),
        )
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`TALLY_ROOT`)
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var("TALLY_ROOT") {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.root_folder {
        return PathBuf::from(path);
    }

    default_root_folder()
}

/// Database file path inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("tally.db")
}

/// Platform config file path (`<config dir>/tally/config.toml`)
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tally (or /var/lib/tally for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tally"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tally"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("tally"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tally"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("tally"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tally"))
    } else {
        PathBuf::from("./tally_data")
    }
}
