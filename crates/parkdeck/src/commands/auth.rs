//! Session command handlers: login, logout, whoami.

use secrecy::SecretString;
use serde::Serialize;

use parkdeck_config::session::{SessionStore, StoredSession};
use parkdeck_core::{Portal, Role, SessionTokens};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WhoamiView {
    email: String,
    role: &'static str,
    partner_id: Option<i64>,
    registration_status: Option<String>,
}

pub async fn handle(
    portal: &Portal,
    profile_name: &str,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { email, password } => {
            let email = match email {
                Some(email) => email,
                None => dialoguer::Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
            };
            let password = match password {
                Some(pw) => SecretString::from(pw),
                None => SecretString::from(
                    rpassword::prompt_password("Password: ")
                        .map_err(CliError::Io)?,
                ),
            };

            let session = portal.login(&email, &password).await?;

            // Persist identity + tokens so later invocations stay
            // authenticated.
            let store = SessionStore::for_profile(profile_name);
            store.save(&StoredSession::from(&session))?;
            if let (Some(access), Some(refresh)) = (
                portal.tokens().access_token(),
                portal.tokens().refresh_token(),
            ) {
                store.save_tokens(&SessionTokens { access, refresh })?;
            }

            util::success(&format!("Logged in as {}", session.email), global);
            Ok(())
        }

        AuthCommand::Refresh => {
            portal.refresh_session().await?;
            let store = SessionStore::for_profile(profile_name);
            if let (Some(access), Some(refresh)) = (
                portal.tokens().access_token(),
                portal.tokens().refresh_token(),
            ) {
                store.save_tokens(&SessionTokens { access, refresh })?;
            }
            util::success("Session tokens rotated", global);
            Ok(())
        }

        AuthCommand::Logout => {
            portal.logout();
            SessionStore::for_profile(profile_name).clear();
            util::success("Logged out", global);
            Ok(())
        }

        AuthCommand::Whoami => {
            let session = portal.session().ok_or(CliError::NotLoggedIn)?;
            let view = WhoamiView {
                email: session.email.clone(),
                role: match session.role {
                    Role::Partner => "partner",
                    Role::Admin => "admin",
                },
                partner_id: session.partner_id,
                registration_status: session.registration_status.clone(),
            };
            output::emit_one(
                global,
                &view,
                |v| {
                    let mut lines = vec![
                        format!("Email:   {}", v.email),
                        format!("Role:    {}", v.role),
                    ];
                    if let Some(partner_id) = v.partner_id {
                        lines.push(format!("Partner: #{partner_id}"));
                    }
                    if let Some(ref status) = v.registration_status {
                        lines.push(format!("Registration: {status}"));
                    }
                    lines.join("\n")
                },
                |v| v.email.clone(),
            );
            Ok(())
        }
    }
}
