//! List, delete and clear commands.

use clap::Args;

use super::{print_notice, prompt_yes_no, stdin_lines};
use crate::app::Ledger;

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Only show codes captured on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Print the rows as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the delete command
#[derive(Args)]
pub struct DeleteArgs {
    /// Exact code to delete
    pub code: String,
}

/// Arguments for the clear command
#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

/// Run the list command
pub async fn list(args: ListArgs, ledger: &Ledger) -> anyhow::Result<()> {
    let mut view = ledger.list_view().await;
    view.set_filter_date(args.date.as_deref());
    let rows = view.rows();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if let Some(date) = view.filter().selected_date() {
        println!("Selected date: {date}");
    }

    if rows.is_empty() {
        println!("No saved codes.");
        return Ok(());
    }

    let width = rows.iter().map(|r| r.code.len()).max().unwrap_or(0).max(4);
    println!("{:<width$}  {}", "Code", "Date");
    for row in &rows {
        println!("{:<width$}  {}", row.code, row.date);
    }
    println!();
    println!("{} of {} codes shown", rows.len(), view.total());

    Ok(())
}

/// Run the delete command
pub async fn delete(args: DeleteArgs, ledger: &Ledger) -> anyhow::Result<()> {
    let mut view = ledger.list_view().await;

    match view.delete(&args.code).await {
        Some(notice) => print_notice(&notice),
        None => println!("No saved code matches {}", args.code),
    }

    Ok(())
}

/// Run the clear command
pub async fn clear(args: ClearArgs, ledger: &Ledger) -> anyhow::Result<()> {
    let confirmed = args.yes
        || prompt_yes_no(&mut stdin_lines(), "Are you sure you want to empty the list?").await?;
    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    let mut view = ledger.list_view().await;
    match view.clear_all().await {
        Some(notice) => print_notice(&notice),
        None => anyhow::bail!("Failed to clear the saved codes"),
    }

    Ok(())
}
