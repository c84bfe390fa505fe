//! Config command implementation.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::Path;

use crate::config::AppConfig;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Write the default configuration, replacing the current file
    Reset,
}

/// Run the config command
pub fn run(args: ConfigArgs, config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    match args.action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to render config")?;
            print!("{content}");
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Reset => {
            AppConfig::default()
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}
