//! Command dispatch: bridges CLI args -> Portal calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod fees;
pub mod lots;
pub mod packages;
pub mod stats;
pub mod subscribers;
pub mod subscriptions;
pub mod users;
pub mod util;

use parkdeck_core::Portal;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a platform-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    portal: &Portal,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(portal, profile_name, args, global).await,
        Command::Lots(args) => lots::handle(portal, args, global).await,
        Command::Packages(args) => packages::handle(portal, args, global).await,
        Command::Subs(args) => subscriptions::handle(portal, args, global).await,
        Command::Subscribers(args) => subscribers::handle(portal, args, global).await,
        Command::Users(args) => users::handle(portal, args, global).await,
        Command::Fees(args) => fees::handle(portal, args, global).await,
        Command::Stats(args) => stats::handle(portal, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
