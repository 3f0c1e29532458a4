//! Non-interactive subcommands: schema setup, inspection and config helpers

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tabled::builder::Builder;
use tabled::{Table, Tabled};
use tiendactl_core::db::{list_tables, table_contents, try_bootstrap};
use tiendactl_core::{Database, LogNotifier, TiendaConfig, Value};
use tracing::info;

#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Table to print (Clientes, Productos, Categorias, Ventas, DetalleVentas)
    pub table: String,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Write a commented config template
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Tab")]
    title: &'static str,
    #[tabled(rename = "Rows")]
    rows: String,
}

fn open(config: &TiendaConfig) -> Database {
    Database::new(config.database.clone(), Arc::new(LogNotifier))
}

pub async fn run_init(config: &TiendaConfig) -> Result<()> {
    let target = config.database.describe();
    let mut db = open(config);

    try_bootstrap(&mut db)
        .await
        .with_context(|| format!("Schema bootstrap failed on {}", target))?;
    let tables = list_tables(&mut db).await?;
    db.disconnect().await;

    println!("Schema ready on {}", target);
    for kind in tables {
        println!("  {}", kind.table());
    }
    Ok(())
}

pub async fn run_tables(config: &TiendaConfig) -> Result<()> {
    let mut db = open(config);
    let kinds = list_tables(&mut db)
        .await
        .with_context(|| format!("Could not list tables on {}", config.database.describe()))?;

    if kinds.is_empty() {
        println!("No store tables found. Run `tiendactl init` first.");
        db.disconnect().await;
        return Ok(());
    }

    let mut rows = Vec::with_capacity(kinds.len());
    for kind in kinds {
        // table names come from the descriptor set, never from input
        let counted = db
            .try_fetch_all(&format!("SELECT COUNT(*) FROM {}", kind.table()), &[])
            .await?;
        let count = counted
            .first()
            .and_then(|row| row.first())
            .map(Value::to_string)
            .unwrap_or_default();

        rows.push(TableRow {
            table: kind.table(),
            title: kind.descriptor().title,
            rows: count,
        });
    }
    db.disconnect().await;

    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn run_dump(config: &TiendaConfig, args: DumpArgs) -> Result<()> {
    let mut db = open(config);
    let contents = table_contents(&mut db, &args.table).await?;
    db.disconnect().await;

    let mut builder = Builder::default();
    builder.push_record(contents.columns.iter().copied());
    let rendered = contents.rendered_rows();
    let count = rendered.len();
    for row in rendered {
        builder.push_record(row);
    }

    println!("{}", builder.build());
    println!("({} rows)", count);
    info!(table = contents.kind.table(), rows = count, "dumped table");
    Ok(())
}

pub fn run_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init(init) => run_config_init(init, path),
    }
}

fn run_config_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }
    fs::write(path, TiendaConfig::template())
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Wrote config template to {}", path.display());
    Ok(())
}
