//! Configuration command handlers (no gateway connection required).

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            profile,
            api_url,
            role,
        } => {
            // Catch obviously bad URLs before writing them to disk.
            let _: url::Url = api_url.parse().map_err(|_| CliError::Validation {
                field: "api-url".into(),
                reason: format!("invalid URL: {api_url}"),
            })?;

            config::write_profile(&profile, &api_url, role.into())?;
            util::success(&format!("Profile '{profile}' written"), global);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = parkdeck_config::load_config_or_default();
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            })?;
            if !global.quiet {
                println!("{rendered}");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", parkdeck_config::config_path().display());
            Ok(())
        }
    }
}
