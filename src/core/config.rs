//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.duka/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::Language;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DukaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub language: Option<Language>,
    pub brand: Option<String>,
    pub restore_history: Option<bool>,
    pub export_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub probe_interval_secs: Option<u64>,
}

/// A canned message bound to a function key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuickReply {
    pub label: String,
    pub message: String,
}

impl QuickReply {
    fn new(label: &str, message: &str) -> Self {
        Self {
            label: label.to_string(),
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_BRAND: &str = "FashionHub Kenya";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;

pub fn default_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply::new("Collections", "Show me your latest collection"),
        QuickReply::new("Sizing", "Help me with sizing"),
        QuickReply::new("Delivery", "What are your delivery options?"),
        QuickReply::new("M-Pesa", "How do I pay with M-Pesa?"),
        QuickReply::new("Store", "Where is your store located?"),
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub probe_interval: Duration,
    pub language: Language,
    pub brand: String,
    pub restore_history: bool,
    pub export_dir: PathBuf,
    pub quick_replies: Vec<QuickReply>,
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

/// Returns the path to `~/.duka/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".duka").join("config.toml"))
}

/// Load config from `~/.duka/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DukaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DukaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DukaConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DukaConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a specific config file.
pub fn load_config_from(path: &Path) -> Result<DukaConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DukaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Duka Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# language = "en"                    # "en" or "sw"
# brand = "FashionHub Kenya"         # Shown in the title bar and transcript header
# restore_history = false            # Load server-side history on startup
# export_dir = "~/Downloads"         # Where Ctrl+D writes transcripts

# [gateway]
# base_url = "http://localhost:5000" # Or set DUKA_BASE_URL env var
# request_timeout_secs = 30

# [connection]
# probe_interval_secs = 15

# [[quick_replies]]
# label = "Delivery"
# message = "What are your delivery options?"
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

/// CLI flags that take part in resolution (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub language: Option<Language>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DukaConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("DUKA_BASE_URL").ok())
        .or_else(|| config.gateway.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Language: CLI → env → config → default
    let language = cli
        .language
        .or_else(|| {
            std::env::var("DUKA_LANGUAGE")
                .ok()
                .and_then(|code| Language::from_code(&code))
        })
        .or(config.general.language)
        .unwrap_or_default();

    let quick_replies = if config.quick_replies.is_empty() {
        default_quick_replies()
    } else {
        config.quick_replies.clone()
    };

    ResolvedConfig {
        base_url,
        // 0 would make every send time out immediately
        request_timeout: Duration::from_secs(
            config
                .gateway
                .request_timeout_secs
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        probe_interval: Duration::from_secs(
            config
                .connection
                .probe_interval_secs
                .unwrap_or(DEFAULT_PROBE_INTERVAL_SECS)
                .max(1),
        ),
        language,
        brand: config
            .general
            .brand
            .clone()
            .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        restore_history: config.general.restore_history.unwrap_or(false),
        export_dir: resolve_export_dir(config.general.export_dir.as_deref()),
        quick_replies,
    }
}

/// Export directory: configured path (with `~/` expanded) → downloads dir → cwd.
fn resolve_export_dir(configured: Option<&str>) -> PathBuf {
    if let Some(dir) = configured {
        if let Some(rest) = dir.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        return PathBuf::from(dir);
    }
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
