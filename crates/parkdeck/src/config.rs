//! Profile resolution: config file + CLI flag overrides → `Portal`.
//!
//! Also restores a persisted session (identity + tokens) for the active
//! profile, so commands after `auth login` are authenticated.

use std::time::Duration;

use parkdeck_config::session::SessionStore;
use parkdeck_config::{Config, Profile};
use parkdeck_core::{Portal, PortalConfig, Role, TlsVerification, TokenSource};

use crate::cli::{GlobalOpts, RoleArg};
use crate::error::CliError;

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Partner => Role::Partner,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// Which profile the invocation targets: `--profile`, else the config
/// file's default, else "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `PortalConfig` from the config file, profile, and CLI overrides.
fn resolve_portal_config(global: &GlobalOpts) -> Result<(PortalConfig, String), CliError> {
    let cfg = parkdeck_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut portal_config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        parkdeck_config::profile_to_portal_config(profile)?
    } else if let Some(ref url_str) = global.api_url {
        // No profile -- build from flags/env alone.
        let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
        PortalConfig {
            url,
            role: global.role.map(Role::from).unwrap_or(Role::Partner),
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(global.timeout),
        }
    } else {
        return Err(CliError::NoConfig {
            path: parkdeck_config::config_path().display().to_string(),
        });
    };

    // Flag overrides beat the profile.
    if let Some(ref url_str) = global.api_url {
        portal_config.url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(role) = global.role {
        portal_config.role = role.into();
    }
    if global.insecure {
        portal_config.tls = TlsVerification::DangerAcceptInvalid;
    }
    portal_config.timeout = Duration::from_secs(global.timeout);

    Ok((portal_config, profile_name))
}

/// Build a `Portal` for this invocation, restoring any persisted
/// session for the active profile.
pub fn build_portal(global: &GlobalOpts) -> Result<(Portal, String), CliError> {
    let (portal_config, profile_name) = resolve_portal_config(global)?;

    let store = SessionStore::for_profile(&profile_name);
    let tokens = store.load_tokens();

    let portal = match tokens {
        Some(ref pair) => {
            Portal::with_tokens(portal_config, TokenSource::with_tokens(pair.clone()))?
        }
        None => Portal::new(portal_config)?,
    };

    if let (Some(stored), Some(pair)) = (store.load(), tokens) {
        match stored.to_active() {
            Ok(session) => portal.restore_session(session, pair),
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable persisted session"),
        }
    }

    Ok((portal, profile_name))
}

/// Write a profile created by `config init`.
pub fn write_profile(profile_name: &str, api_url: &str, role: Role) -> Result<(), CliError> {
    let mut cfg = parkdeck_config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.to_owned(),
        Profile {
            api_url: api_url.to_owned(),
            role: match role {
                Role::Partner => "partner".into(),
                Role::Admin => "admin".into(),
            },
            ca_cert: None,
            insecure: None,
            timeout: None,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.to_owned());
    }
    parkdeck_config::save_config(&cfg)?;
    Ok(())
}
