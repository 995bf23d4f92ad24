//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatline/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatlineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub storage_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub markdown: Option<bool>,
    pub assistant_name: Option<String>,
    pub avatar: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ASSISTANT_NAME: &str = "assistant";
pub const DEFAULT_AVATAR: &str = "◆";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub markdown: bool,
    pub assistant_name: String,
    pub avatar: String,
    pub log_level: LevelFilter,
    /// Durable storage file. `None` when no home directory is available.
    pub storage_path: Option<PathBuf>,
}

/// Values that come from CLI flags. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub plain: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.chatline/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatline"))
}

/// Returns the path to `~/.chatline/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.chatline/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatlineConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatlineConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatlineConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChatlineConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatlineConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatlineConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Chatline Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                  # "error", "warn", "info", "debug", "trace", "off"
# storage_file = "storage.json"        # Path relative to ~/.chatline/

# [service]
# base_url = "http://localhost:5000"   # Or set CHATLINE_BASE_URL, or pass --base-url
# timeout_secs = 30                    # Or set CHATLINE_TIMEOUT_SECS

# [display]
# markdown = true                      # false (or --plain) renders replies as literal text
# assistant_name = "assistant"
# avatar = "◆"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatlineConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("CHATLINE_BASE_URL").ok())
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: env → config → default. Zero would fail every request instantly.
    let timeout_secs = std::env::var("CHATLINE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .or(config.service.timeout_secs)
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let markdown = !cli.plain && config.display.markdown.unwrap_or(true);

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(timeout_secs),
        markdown,
        assistant_name: config
            .display
            .assistant_name
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
        avatar: config
            .display
            .avatar
            .clone()
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        log_level: resolve_log_level(config.general.log_level.as_deref()),
        storage_path: resolve_storage_path(config),
    }
}

fn resolve_log_level(level: Option<&str>) -> LevelFilter {
    match level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        None => LevelFilter::Debug,
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(other) => {
            warn!("Unknown log_level {:?}, using debug", other);
            LevelFilter::Debug
        }
    }
}

/// Storage file: `[general] storage_file` relative to `~/.chatline/`, else `storage.json` there.
fn resolve_storage_path(config: &ChatlineConfig) -> Option<PathBuf> {
    let dir = config_dir()?;
    let file = config
        .general
        .storage_file
        .as_deref()
        .unwrap_or("storage.json");
    Some(dir.join(file))
}
