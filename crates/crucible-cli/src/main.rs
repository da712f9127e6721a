//! Crucible CI CLI entrypoint.

use clap::Parser;

mod commands;
mod config;
mod handlers;

use commands::{Commands, ConfigCommands};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "crucible")]
#[command(author, version, about = "Crucible CI command-line interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = CliConfig::load().unwrap_or_default();

    match cli.command {
        Commands::Init => handlers::init().await?,
        Commands::Validate { path } => handlers::validate(&path).await?,
        Commands::Resolve { path, json } => handlers::resolve(&path, json).await?,
        Commands::Run {
            path,
            workspace,
            hardware,
            dry_run,
        } => handlers::run(&config, &path, workspace, hardware, dry_run).await?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => handlers::show_config(&config)?,
            ConfigCommands::Set { key, value } => handlers::set_config(&key, &value)?,
        },
    }

    Ok(())
}
