use bb_api::{
    auth::Credentials, config::ClientConfig, error::ApiError, session::BlackboardSession,
};
use clap::Args;
use log::{debug, warn};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::{
    cli::{extra::prompt_cookie, Cli},
    error::CliError,
};

#[derive(Debug, Args)]
pub struct Login {
    /// Store the cookie without checking it against the server
    #[clap(long, value_parser, default_value_t = false)]
    no_check: bool,
}

impl Login {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let credentials = match &args.cookie {
            Some(cookie) => Credentials::new(cookie.as_str())?,
            None => prompt_cookie()?,
        };

        if !self.no_check {
            match args.api_url(config) {
                Ok(url) => {
                    let session = BlackboardSession::with_timeout(
                        &url,
                        &credentials,
                        Duration::from_secs(config.session.timeout),
                    )?;

                    match session.username().await {
                        Ok(name) => println!(
                            "{} {}",
                            "Authenticated as".bold(),
                            name.trim_start_matches("userName:").green().bold()
                        ),
                        Err(ApiError::Unauthorized { .. }) => {
                            println!("{}", "The server rejected this cookie.".bold().red());
                            return Err(CliError::NotLoggedIn);
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                Err(_) => warn!("No API URL configured, storing the cookie without checking it"),
            }
        }

        credentials.save().await?;
        debug!("Credentials stored at {}", Credentials::cache_path()?.display());

        println!("{}", "Session cookie saved".bold().green());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct Logout;

impl Logout {
    pub async fn run(&self) -> Result<(), CliError> {
        Credentials::forget().await?;
        println!("{}", "Session cookie removed".bold().blue());
        Ok(())
    }
}
