//! Configuration resolution for Filmbase.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/filmbase/settings.json)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (`FILMBASE_*`)
//! 5. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete Filmbase configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub addr: String,
    /// `SQLite` database file. Falls back to [`database_path`] when unset.
    pub database_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
            database_path: None,
        }
    }
}

/// Session and cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: i64,
    /// Mark the session cookie `Secure` (HTTPS only).
    pub secure_cookie: bool,
    /// How often expired sessions are swept from the store (seconds).
    pub session_sweep_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 24 * 60 * 60,
            secure_cookie: false,
            session_sweep_interval_secs: 60 * 60,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Load configuration with hierarchical resolution.
///
/// A missing global file is ignored; a missing explicit file is an error.
/// Each file only overrides the keys it sets.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            config = overlay_file(&config, &global_path)?;
        }
    }

    if let Some(path) = explicit_path {
        config = overlay_file(&config, path)?;
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Default database location when none is configured.
pub fn database_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("filmbase.db"))
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".filmbase"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/filmbase"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("filmbase"))
    }
}

/// Lay the settings found in `path` over `base`, key by key.
fn overlay_file(base: &Config, path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let overlay: Value = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;

    let mut merged = serde_json::to_value(base)?;
    merge_values(&mut merged, overlay);
    serde_json::from_value(merged).map_err(|e| {
        Error::Config(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Recursively merge JSON objects; any other overlay value replaces the base.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_values(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply `FILMBASE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(val) = lookup("FILMBASE_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = lookup("FILMBASE_DB_PATH") {
        config.server.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("FILMBASE_SESSION_TTL") {
        config.auth.session_ttl_secs = parse_env("FILMBASE_SESSION_TTL", &val)?;
    }
    if let Some(val) = lookup("FILMBASE_SECURE_COOKIE") {
        config.auth.secure_cookie = parse_env("FILMBASE_SECURE_COOKIE", &val)?;
    }
    if let Some(val) = lookup("FILMBASE_LOG_LEVEL") {
        config.logging.level = val;
    }
    if let Some(val) = lookup("FILMBASE_LOG_JSON") {
        config.logging.json = parse_env("FILMBASE_LOG_JSON", &val)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, val: &str) -> Result<T> {
    val.parse()
        .map_err(|_| Error::Config(format!("Invalid value for {key}: {val:?}")))
}
