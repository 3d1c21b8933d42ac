use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod db;
mod export;
mod models;
mod session;

use commands::{ConfigCommand, ExportCommand, FarmerCommand};
use config::Config;
use db::{init_db, FarmerRepository};

#[derive(Parser)]
#[command(name = "fieldbook")]
#[command(version)]
#[command(about = "Field records data entry and export", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage farmer records
    Farmer(FarmerCommand),

    /// Export a farmer's records as a spreadsheet
    Export(ExportCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Farmer(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = FarmerRepository::new(pool);
            cmd.run(&repo).await?;
        }
        Some(Commands::Export(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = FarmerRepository::new(pool);
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
