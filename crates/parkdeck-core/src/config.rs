// ── Runtime connection configuration ──
//
// These types describe *how* to reach the platform gateway. They carry
// connection tuning but never touch disk -- the CLI/TUI constructs a
// `PortalConfig` from profile files and hands it in.

use std::time::Duration;

use url::Url;

use parkdeck_api::{Role, TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default -- the platform gateway runs
    /// behind real certificates.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (staging environments).
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging gateways).
    DangerAcceptInvalid,
}

/// Configuration for connecting to the platform.
///
/// Built by CLI/TUI, passed to [`Portal`](crate::Portal) -- core never
/// reads config files.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Gateway base URL (e.g., `https://api.parkdeck.example`).
    pub url: Url,
    /// Which role this session authenticates as.
    pub role: Role,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl PortalConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: "https://api.parkdeck.example"
                .parse()
                .expect("default URL is valid"),
            role: Role::Partner,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
