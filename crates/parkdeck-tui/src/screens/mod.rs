//! Screen modules and the commands they hand back to the app loop.

pub mod dashboard;
pub mod lots;
pub mod packages;
pub mod subscribers;

use parkdeck_core::SubscriptionPackageCreate;

/// Severity of a transient toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// What a screen asks the app loop to do after handling a key.
///
/// Screens never touch the network themselves -- fetches and mutations
/// are spawned by the app so their outcomes flow back through one
/// channel.
#[derive(Debug)]
pub enum ScreenCommand {
    /// Refetch the active screen's data.
    Refresh,
    /// Submit a validated create-package body.
    SubmitPackage(SubscriptionPackageCreate),
    /// Show a transient notification.
    Toast(String, ToastLevel),
}
