mod commands;
mod tracing_setup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tiendactl_core::db::bootstrap;
use tiendactl_core::{load_dotenv, ChannelNotifier, Database, TiendaConfig};
use tracing::info;

use commands::{ConfigArgs, DumpArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "tiendactl",
    version,
    about = "Store manager for customers, products, categories and sales"
)]
struct Cli {
    /// Config file (default: ~/.tiendactl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the tabbed terminal UI (default)
    Ui,
    /// Create any missing store tables
    Init,
    /// List the store tables present in the database
    Tables,
    /// Print every row of a store table
    Dump(DumpArgs),
    /// Config file helpers (path, init)
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    let log_file = match command {
        Commands::Ui => Some(TiendaConfig::config_dir().join("tiendactl.log")),
        _ => None,
    };
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        log_file,
    })?;

    let config_path = cli.config.unwrap_or_else(TiendaConfig::config_path);

    // Config helpers must work even when the current config is broken
    if let Commands::Config(args) = command {
        return commands::run_config(args, &config_path);
    }

    load_dotenv();
    let config = TiendaConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    match command {
        Commands::Ui => run_ui(config).await,
        Commands::Init => commands::run_init(&config).await,
        Commands::Tables => commands::run_tables(&config).await,
        Commands::Dump(args) => commands::run_dump(&config, args).await,
        Commands::Config(_) => Ok(()), // handled above
    }
}

async fn run_ui(config: TiendaConfig) -> Result<()> {
    info!(target_db = %config.database.describe(), "starting UI");

    let (notifier, notices) = ChannelNotifier::channel();
    let mut db = Database::new(config.database, Arc::new(notifier));

    // A failed bootstrap is queued as a notice and shown once the UI is up
    bootstrap(&mut db).await;

    tiendactl_tui::run(&mut db, notices).await
}
