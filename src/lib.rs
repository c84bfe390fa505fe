//! # barcode-ledger
//!
//! Scan barcodes into a local ledger, filter them by date and export them to
//! Excel workbooks.
//!
//! ## Features
//!
//! - **Entry Store**: the scanned codes live as one JSON blob in a key-value store
//! - **Scan Session**: scan, confirm, reject duplicates, persist
//! - **List View**: date filter, single-entry delete, clear
//! - **Export**: `.xlsx` workbook, media album copy and share sheet hand-off
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use barcode_ledger::app::Ledger;
//! use barcode_ledger::config::AppConfig;
//! use barcode_ledger::scan::ScanEvent;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! let ledger = Ledger::from_config(&config);
//!
//! let (mut session, _) = ledger.scan_session().await;
//! session.on_scanned(ScanEvent::new("ean13", "4006381333931"));
//! let outcome = session.confirm(true).await;
//! println!("{:?}", outcome);
//!
//! let view = ledger.list_view().await;
//! let report = ledger.export().export(view.visible(), None).await;
//! println!("Exported to {:?}", report.file);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod export;
pub mod logging;
pub mod notice;
pub mod platform;
pub mod scan;
pub mod storage;
pub mod store;
pub mod time;
pub mod view;

// Re-export commonly used types
pub use entry::{AppendOutcome, EntryCollection, ScanEntry};
pub use error::{Error, Result};
pub use export::{ExportPipeline, ExportReport};
pub use notice::{Notice, NoticeKind, NoticeLevel};
pub use store::EntryStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
