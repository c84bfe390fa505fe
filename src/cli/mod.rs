//! Command-line interface for barcode-ledger.
//!
//! Each subcommand maps to one user action of the scanner app: scanning and
//! confirming codes, browsing the saved list, deleting or clearing entries,
//! and exporting to a workbook.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::notice::{Notice, NoticeLevel};

pub mod config;
pub mod entries;
pub mod export;
pub mod scan;

/// barcode-ledger - scan, list and export barcodes
#[derive(Parser)]
#[command(name = "barcode-ledger")]
#[command(about = "Scan barcodes into a local ledger and export them to Excel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored entries
    #[arg(long, global = true, env = "BARCODE_LEDGER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan codes and save them after confirmation
    Scan(scan::ScanArgs),
    /// List saved codes
    List(entries::ListArgs),
    /// Delete one saved code
    Delete(entries::DeleteArgs),
    /// Delete every saved code
    Clear(entries::ClearArgs),
    /// Export saved codes to an Excel workbook
    Export(export::ExportArgs),
    /// Show or initialise the configuration
    Config(config::ConfigArgs),
}

/// Print a notice the way the app would pop up an alert
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Error | NoticeLevel::Warning => eprintln!("{notice}"),
        NoticeLevel::Info | NoticeLevel::Success => println!("{notice}"),
    }
}

/// Line reader over stdin. Create it once per command and share it between
/// prompts; buffered input is lost when a reader is dropped.
pub fn stdin_lines() -> Lines<BufReader<Stdin>> {
    use tokio::io::AsyncBufReadExt;
    BufReader::new(tokio::io::stdin()).lines()
}

/// Ask a yes/no question, reading the answer from `answers`. Anything but
/// `y`/`yes` is a no, including end of input.
pub async fn prompt_yes_no<R>(answers: &mut Lines<R>, question: &str) -> anyhow::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{question} [y/N] ").as_bytes()).await?;
    stdout.flush().await?;

    let answer = answers.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tokio::io::AsyncBufReadExt;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_prompts_share_one_reader() {
        let input: &[u8] = b"y\nno\nYES\n";
        let mut answers = BufReader::new(input).lines();

        assert!(prompt_yes_no(&mut answers, "first?").await.unwrap());
        assert!(!prompt_yes_no(&mut answers, "second?").await.unwrap());
        assert!(prompt_yes_no(&mut answers, "third?").await.unwrap());
        assert!(!prompt_yes_no(&mut answers, "past the end?").await.unwrap());
    }

    #[test]
    fn test_parse_export_with_date() {
        let cli = Cli::try_parse_from(["barcode-ledger", "export", "--date", "2024-10-01"]).unwrap();
        match cli.command {
            Commands::Export(args) => assert_eq!(args.date.as_deref(), Some("2024-10-01")),
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn test_parse_scan_codes() {
        let cli = Cli::try_parse_from(["barcode-ledger", "scan", "--yes", "A1", "B2"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert!(args.yes);
                assert_eq!(args.codes, vec!["A1", "B2"]);
            }
            _ => panic!("Wrong command"),
        }
    }
}
