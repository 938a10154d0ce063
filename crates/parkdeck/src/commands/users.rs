//! User lookup command handlers.

use tabled::Tabled;
use uuid::Uuid;

use parkdeck_core::model::User;
use parkdeck_core::Portal;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.full_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
        }
    }
}

fn user_detail(user: &User) -> String {
    [
        format!("ID:    {}", user.id),
        format!("Name:  {}", user.full_name.as_deref().unwrap_or("-")),
        format!("Email: {}", user.email.as_deref().unwrap_or("-")),
        format!("Phone: {}", user.phone.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(portal: &Portal, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::Get { user } => {
            let id: Uuid = user.parse().map_err(|_| CliError::Validation {
                field: "user".into(),
                reason: format!("'{user}' is not a UUID"),
            })?;
            let user = portal.user(id).await?;
            output::emit_one(global, &user, user_detail, |u| u.id.to_string());
            Ok(())
        }

        UsersCommand::List(list) => {
            let users = portal.list_users(util::page_request(&list)).await?;
            output::emit_list(global, &users, |u| UserRow::from(u), |u| u.id.to_string());
            Ok(())
        }
    }
}
