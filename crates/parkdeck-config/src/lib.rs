//! Shared configuration for the parkdeck CLI and TUI.
//!
//! TOML profiles with `PARKDECK_*` env overrides, translation to
//! `parkdeck_core::PortalConfig`, and the persisted session store
//! ([`session`]). Both binaries depend on this crate -- the CLI adds
//! flag-aware wrappers on top.

pub mod session;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parkdeck_core::{PortalConfig, Role, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' is configured")]
    NoProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session store error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named gateway profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Platform gateway base URL (e.g., "https://api.parkdeck.example").
    pub api_url: String,

    /// Account role: "partner" or "admin".
    #[serde(default = "default_role")]
    pub role: String,

    /// Path to custom CA certificate (staging).
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_role() -> String {
    "partner".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "parkdeck", "parkdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory where per-profile session files live.
pub fn sessions_dir() -> PathBuf {
    ProjectDirs::from("com", "parkdeck", "parkdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("sessions");
            p
        },
        |dirs| dirs.config_dir().join("sessions"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("parkdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PARKDECK_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to PortalConfig ─────────────────────────────────────

/// Parse a profile's `role` field.
pub fn parse_role(role: &str) -> Result<Role, ConfigError> {
    match role.to_ascii_lowercase().as_str() {
        "partner" => Ok(Role::Partner),
        "admin" => Ok(Role::Admin),
        other => Err(ConfigError::Validation {
            field: "role".into(),
            reason: format!("expected 'partner' or 'admin', got '{other}'"),
        }),
    }
}

/// Build a `PortalConfig` from a profile -- no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers.
pub fn profile_to_portal_config(profile: &Profile) -> Result<PortalConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let role = parse_role(&profile.role)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(PortalConfig {
        url,
        role,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn profile_translates_to_portal_config() {
        let profile = Profile {
            api_url: "https://api.parkdeck.example".into(),
            role: "admin".into(),
            ca_cert: None,
            insecure: None,
            timeout: Some(10),
        };
        let cfg = profile_to_portal_config(&profile).unwrap();
        assert_eq!(cfg.role, Role::Admin);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let profile = Profile {
            api_url: "https://api.parkdeck.example".into(),
            role: "superuser".into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        };
        assert!(matches!(
            profile_to_portal_config(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn insecure_flag_wins_over_ca_cert() {
        let profile = Profile {
            api_url: "https://staging.parkdeck.example".into(),
            role: "partner".into(),
            ca_cert: Some(PathBuf::from("/tmp/ca.pem")),
            insecure: Some(true),
            timeout: None,
        };
        let cfg = profile_to_portal_config(&profile).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }
}
