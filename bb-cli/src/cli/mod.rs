use bb_api::{auth::Credentials, config::ClientConfig, session::BlackboardSession};
use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use log::debug;

use self::commands::{
    attachments::{Attachments, Download},
    contents::Contents,
    courses::Courses,
    login::{Login, Logout},
    Version, Whoami,
};
use crate::error::CliError;

pub mod commands;
pub(crate) mod extra;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store the session cookie used to authenticate
    Login(Login),
    /// Delete the stored session cookie
    Logout(Logout),
    /// Print the username of the session owner
    Whoami(Whoami),
    /// List the courses a user is enrolled in
    Courses(Courses),
    /// List the contents of a course
    Contents(Contents),
    /// List the file attachments of a content item
    Attachments(Attachments),
    /// Download the file attachments of a content item
    Download(Download),
    /// Print the Learn server version
    Version(Version),
}

#[derive(Parser, Debug)]
#[clap(name = "Blackboard Client", author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub mode: Commands,

    /// Base URL of the REST API
    ///
    /// `{version}` is replaced with the API version of each endpoint, e.g.
    /// https://blackboard.example.org/learn/api/public/v{version}
    #[clap(short, long, env = "BB_URL", value_name = "URL", global = true)]
    pub url: Option<String>,

    /// Session cookie header to use instead of the stored one
    #[clap(long, env = "BB_COOKIE", hide_env_values = true, global = true)]
    pub cookie: Option<String>,

    /// Read the configuration from this file instead of the default one
    #[clap(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(&self) -> Result<(), CliError> {
        let config = self.load_config().await?;

        match &self.mode {
            Commands::Login(cmd) => cmd.run(self, &config).await,
            Commands::Logout(cmd) => cmd.run().await,
            Commands::Whoami(cmd) => cmd.run(self, &config).await,
            Commands::Courses(cmd) => cmd.run(self, &config).await,
            Commands::Contents(cmd) => cmd.run(self, &config).await,
            Commands::Attachments(cmd) => cmd.run(self, &config).await,
            Commands::Download(cmd) => cmd.run(self, &config).await,
            Commands::Version(cmd) => cmd.run(self, &config).await,
        }
    }

    pub async fn load_config(&self) -> Result<ClientConfig, CliError> {
        let config = match &self.config {
            Some(path) => ClientConfig::load_from(path).await?,
            None => ClientConfig::load().await?,
        };
        Ok(config)
    }

    /// API URL from the command line, falling back to the config file.
    pub fn api_url(&self, config: &ClientConfig) -> Result<String, CliError> {
        self.url
            .clone()
            .or_else(|| config.session.url.clone())
            .ok_or(CliError::MissingUrl)
    }

    /// Cookie from the command line, falling back to the stored one.
    pub async fn credentials(&self) -> Result<Credentials, CliError> {
        if let Some(cookie) = &self.cookie {
            debug!("Using session cookie from the command line");
            return Ok(Credentials::new(cookie.as_str())?);
        }

        Credentials::load().await?.ok_or(CliError::NotLoggedIn)
    }

    pub async fn session(&self, config: &ClientConfig) -> Result<BlackboardSession, CliError> {
        let url = self.api_url(config)?;
        let credentials = self.credentials().await?;

        Ok(BlackboardSession::with_timeout(
            &url,
            &credentials,
            Duration::from_secs(config.session.timeout),
        )?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Built by hand so `BB_URL`/`BB_COOKIE` from the environment can't leak in.
    fn cli(url: Option<&str>, cookie: Option<&str>) -> Cli {
        Cli {
            mode: Commands::Whoami(Whoami),
            url: url.map(String::from),
            cookie: cookie.map(String::from),
            config: None,
        }
    }

    #[test]
    fn url_precedence() {
        let mut config = ClientConfig::default();
        config.session.url = Some(String::from("https://from.config/v{version}"));

        assert_eq!(
            cli(None, None).api_url(&config).unwrap(),
            "https://from.config/v{version}"
        );

        let flag = cli(Some("https://from.flag/v{version}"), None);
        assert_eq!(
            flag.api_url(&config).unwrap(),
            "https://from.flag/v{version}"
        );

        assert!(matches!(
            cli(None, None).api_url(&ClientConfig::default()),
            Err(CliError::MissingUrl)
        ));
    }

    #[test]
    fn default_config_has_no_url() {
        let config = ClientConfig::from_config(bb_api::config::DEFAULT_CONFIG_TOML).unwrap();

        assert!(matches!(
            cli(None, None).api_url(&config),
            Err(CliError::MissingUrl)
        ));
    }

    #[tokio::test]
    async fn cookie_flag_wins() {
        let creds = cli(None, Some("JSESSIONID=abc")).credentials().await.unwrap();
        assert_eq!(creds.cookie(), "JSESSIONID=abc");

        assert!(matches!(
            cli(None, Some(" ")).credentials().await,
            Err(CliError::CredentialsFail { .. })
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "bbctl",
            "contents",
            "_1_1",
            "--parent",
            "_2_1",
            "--url",
            "https://bb.test/v{version}",
        ]);

        assert_eq!(cli.url.as_deref(), Some("https://bb.test/v{version}"));
        assert!(matches!(cli.mode, Commands::Contents(_)));
    }
}
