//! Configuration loading and root folder resolution
//!
//! Settings come from, in priority order:
//! 1. Command-line arguments (applied by each binary)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is never fatal: a warning is logged and the
//! compiled defaults are used. A config file that exists but cannot be
//! parsed is a `Error::Config`.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG: &str = "FLAVORMAP_CONFIG";
/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "FLAVORMAP_ROOT_FOLDER";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/spots";
pub const DEFAULT_SNAPSHOT_URL: &str = "http://127.0.0.1:8000/data/spots.json";

/// Configuration loaded from the TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder for on-device data (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Primary (dynamic) spots resource
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Secondary (static, read-only) snapshot resource
    #[serde(default = "default_snapshot_url")]
    pub snapshot_url: String,

    /// Request timeout for the HTTP transport; no timeout when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Backend bind settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend bind settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_snapshot_url() -> String {
    DEFAULT_SNAPSHOT_URL.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            api_url: default_api_url(),
            snapshot_url: default_snapshot_url(),
            request_timeout_secs: None,
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Locate and load the config file, falling back to defaults when none exists
    pub fn load() -> Result<Self> {
        match locate_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Find the config file for this platform
///
/// `$FLAVORMAP_CONFIG` wins; otherwise the user config directory, then (on
/// Linux) `/etc/flavormap/config.toml`.
fn locate_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!(path = %path.display(), "{} points at a missing file", ENV_CONFIG);
    }

    let user_config = dirs::config_dir().map(|d| d.join("flavormap").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/flavormap/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder: CLI argument, environment, TOML, then OS default
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/flavormap
        dirs::data_local_dir()
            .map(|d| d.join("flavormap"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/flavormap"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/flavormap
        dirs::data_dir()
            .map(|d| d.join("flavormap"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/flavormap"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\flavormap
        dirs::data_local_dir()
            .map(|d| d.join("flavormap"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\flavormap"))
    } else {
        PathBuf::from("./flavormap_data")
    }
}

/// Layout of files under the root folder
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path)?;
        Ok(())
    }

    /// SQLite database used by the backend
    pub fn database_path(&self) -> PathBuf {
        self.path.join("flavormap.db")
    }

    /// Directory holding the client's on-device key/value storage
    pub fn local_storage_dir(&self) -> PathBuf {
        self.path.join("local-storage")
    }
}
