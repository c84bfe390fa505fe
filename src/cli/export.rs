//! Export command implementation.

use clap::Args;

use super::print_notice;
use crate::app::Ledger;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Only export codes captured on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Run the export command
pub async fn run(args: ExportArgs, ledger: &Ledger) -> anyhow::Result<()> {
    let mut view = ledger.list_view().await;
    view.set_filter_date(args.date.as_deref());

    let report = ledger
        .export()
        .export(view.visible(), view.filter().selected_date())
        .await;

    for notice in &report.notices {
        print_notice(notice);
    }

    if let Some(file) = &report.file {
        println!("Workbook: {}", file.display());
    }
    if let Some(location) = &report.album_location {
        println!("Album copy: {}", location.display());
    }

    Ok(())
}
