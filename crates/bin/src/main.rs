//! The Cardfolio CLI.
//!
//! A thin front end over the `cardfolio` engine: sessions persist in a
//! JSON state file in the data directory, so `login` once and the other
//! commands reuse the session until it expires or `logout`.

mod cli;
mod commands;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardfolio::store::JsonFile;
use cardfolio::{Client, Plan, Settings};

use cli::{Cli, Commands, PlanArg};

const STATE_FILE: &str = "cardfolio.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cardfolio=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let settings = build_settings(&cli);

    let state_path = cli
        .data_dir
        .clone()
        .unwrap_or_default()
        .join(STATE_FILE);
    let store = Arc::new(JsonFile::open(&state_path)?);
    tracing::debug!(path = %state_path.display(), "using state file");

    let client = Client::open(settings, store)?;

    match &cli.command {
        Commands::Login(args) => commands::auth::login(&client, args).await?,
        Commands::Status => commands::auth::status(&client).await?,
        Commands::Logout => commands::auth::logout(&client).await?,
        Commands::Show(args) => commands::profile::show(&client, args).await?,
        Commands::Set(args) => commands::profile::set(&client, args).await?,
        Commands::Links(args) => commands::profile::links(&client, &args.action).await?,
        Commands::Edit => commands::profile::edit(&client).await?,
        Commands::Analytics => commands::stats::analytics(&client).await?,
        Commands::Upload(args) => commands::upload::upload(&client, args).await?,
    }
    Ok(())
}

fn build_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::default();
    if let Some(url) = &cli.script_url {
        settings.script_url = url.clone();
    }
    if let Some(url) = &cli.analytics_url {
        settings.analytics_url = url.clone();
    }
    if let Some(url) = &cli.upload_url {
        settings.upload_url = url.clone();
    }
    settings.plan = match cli.plan {
        PlanArg::Basic => Plan::Basic,
        PlanArg::Standard => Plan::Standard,
        PlanArg::Premium => Plan::Premium,
    };
    settings.logout_on_close = cli.logout_on_close;
    settings
}
