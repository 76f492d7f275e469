use bb_api::config::ClientConfig;
use clap::Args;
use owo_colors::OwoColorize;

use crate::{cli::Cli, error::CliError};

pub mod attachments;
pub mod contents;
pub mod courses;
pub mod login;

#[derive(Debug, Args)]
pub struct Whoami;

impl Whoami {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;
        let username = session.username().await?;

        println!(
            "{} {}",
            "Logged in as".bold(),
            username.trim_start_matches("userName:").green().bold()
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct Version;

impl Version {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;
        let version = session.fetch_version().await?;

        let learn = &version["learn"];
        match (learn["major"].as_u64(), learn["minor"].as_u64()) {
            (Some(major), Some(minor)) => println!(
                "{} {}",
                "Blackboard Learn".bold().blue(),
                format!(
                    "{major}.{minor}.{}",
                    learn["patch"].as_u64().unwrap_or_default()
                )
                .bold()
                .green()
            ),
            _ => println!("{version:#}"),
        }
        Ok(())
    }
}
