#![deny(clippy::all)]
use bb_cli::cli::Cli;
use clap::Parser;
use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    args.run().await?;

    Ok(())
}
