//! barcode-ledger - scan, list and export barcodes
//!
//! Main binary entry point for the command-line interface.

use anyhow::Context;
use clap::Parser;
use barcode_ledger::app::Ledger;
use barcode_ledger::cli::{self, Cli, Commands};
use barcode_ledger::config::AppConfig;
use barcode_ledger::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::default_path()?,
    };
    let mut config = AppConfig::load(Some(config_path.as_path()))
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    match &config.logging.file {
        Some(file) => logging::init_file_logging(file, &config.logging.level, cli.verbose)?,
        None => logging::init_logging(&config.logging.level, cli.verbose)?,
    }

    let ledger = Ledger::from_config(&config);

    match cli.command {
        Commands::Scan(args) => cli::scan::run(args, &ledger).await,
        Commands::List(args) => cli::entries::list(args, &ledger).await,
        Commands::Delete(args) => cli::entries::delete(args, &ledger).await,
        Commands::Clear(args) => cli::entries::clear(args, &ledger).await,
        Commands::Export(args) => cli::export::run(args, &ledger).await,
        Commands::Config(args) => cli::config::run(args, &config, &config_path),
    }
}
