//! Export pipeline: entries → workbook file → media album → share sheet.
//!
//! Each step reports to the user through notices. A failing step does not
//! undo earlier ones: a workbook that was written stays on disk even if the
//! album copy or the share afterwards fails.

pub mod xlsx;

use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::entry::ScanEntry;
use crate::notice::Notice;
use crate::platform::{MediaLibrary, Permission, PermissionProvider, ShareSheet};
use crate::time::Clock;
use crate::Result;

pub use xlsx::{encode_workbook, SheetTable};

/// Header row of the exported sheet
pub const HEADER: [&str; 2] = ["code", "date"];

/// Where and how exports are written
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// App-private directory the workbook is written to
    pub documents_dir: PathBuf,
    /// Media album the workbook is copied into when permitted
    pub album_name: String,
    pub sheet_name: String,
}

impl ExportSettings {
    pub fn new(documents_dir: &Path) -> Self {
        Self {
            documents_dir: documents_dir.to_path_buf(),
            album_name: "Excel Files".to_string(),
            sheet_name: "Barcodes".to_string(),
        }
    }
}

/// What an export run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Workbook written to the documents directory
    pub file: Option<PathBuf>,
    /// Where the album copy ended up
    pub album_location: Option<PathBuf>,
    pub shared: bool,
    pub notices: Vec<Notice>,
}

impl ExportReport {
    fn notify(&mut self, notice: Notice) {
        debug!("Export notice: {}", notice);
        self.notices.push(notice);
    }
}

/// Sheet contents for `entries`: header row, then `code` and the date
/// portion of the timestamp per entry
pub fn build_sheet(entries: &[ScanEntry], sheet_name: &str) -> SheetTable {
    let mut sheet = SheetTable::new(sheet_name);
    sheet.push_row(HEADER);
    for entry in entries {
        sheet.push_row([entry.code.clone(), entry.date_part()]);
    }
    sheet
}

/// `barcodes_<date>.xlsx`, using the filter date when one is active
pub fn export_file_name(filter_date: Option<&str>, today: NaiveDate) -> String {
    let date: String = match filter_date.filter(|d| !d.is_empty()) {
        Some(date) => date
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect(),
        None => today.format("%Y-%m-%d").to_string(),
    };
    format!("barcodes_{date}.xlsx")
}

/// Runs exports against the platform capabilities
pub struct ExportPipeline {
    settings: ExportSettings,
    permissions: Arc<dyn PermissionProvider>,
    media: Arc<dyn MediaLibrary>,
    share: Arc<dyn ShareSheet>,
    clock: Arc<dyn Clock>,
}

impl ExportPipeline {
    pub fn new(
        settings: ExportSettings,
        permissions: Arc<dyn PermissionProvider>,
        media: Arc<dyn MediaLibrary>,
        share: Arc<dyn ShareSheet>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            permissions,
            media,
            share,
            clock,
        }
    }

    /// Export the currently visible entries. `filter_date` only names the file.
    pub async fn export(&self, entries: &[ScanEntry], filter_date: Option<&str>) -> ExportReport {
        let span = info_span!("export", entries = entries.len(), filter = ?filter_date);
        self.run(entries, filter_date).instrument(span).await
    }

    async fn run(&self, entries: &[ScanEntry], filter_date: Option<&str>) -> ExportReport {
        let mut report = ExportReport::default();

        if entries.is_empty() {
            info!("Nothing to export");
            report.notify(Notice::nothing_to_export());
            return report;
        }

        let file_name = export_file_name(filter_date, self.clock.today());
        let path = match self.write_workbook(entries, &file_name).await {
            Ok(path) => path,
            Err(e) => {
                error!("Error exporting the file: {}", e);
                report.notify(Notice::export_failed(e));
                return report;
            }
        };
        report.file = Some(path.clone());

        self.save_to_album(&path, &mut report).await;
        self.offer_share(&path, &mut report).await;

        report
    }

    async fn write_workbook(&self, entries: &[ScanEntry], file_name: &str) -> Result<PathBuf> {
        let sheet = build_sheet(entries, &self.settings.sheet_name);
        let bytes = encode_workbook(&sheet)?;

        fs::create_dir_all(&self.settings.documents_dir).await?;
        let path = self.settings.documents_dir.join(file_name);
        fs::write(&path, &bytes).await?;

        info!(
            "Exported {} entries ({} bytes) to {}",
            entries.len(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    async fn save_to_album(&self, path: &Path, report: &mut ExportReport) {
        let granted = match self.permissions.request(Permission::MediaLibrary).await {
            Ok(status) => status.is_granted(),
            Err(e) => {
                warn!("Media library permission request failed: {}", e);
                false
            }
        };

        if !granted {
            warn!("Media library permission denied; {} stays in documents", path.display());
            report.notify(Notice::media_permission_denied());
            return;
        }

        let placed = async {
            let asset = self.media.create_asset(path).await?;
            self.media.add_to_album(&self.settings.album_name, &asset).await
        }
        .await;

        match placed {
            Ok(location) => {
                info!("Copied export into album '{}'", self.settings.album_name);
                report.album_location = Some(location);
                report.notify(Notice::exported(path.display()));
            }
            Err(e) => {
                error!("Error saving the export to the media library: {}", e);
                report.notify(Notice::export_failed(e));
            }
        }
    }

    async fn offer_share(&self, path: &Path, report: &mut ExportReport) {
        if !self.share.is_available().await {
            report.notify(Notice::sharing_unavailable());
            return;
        }

        match self.share.share(path).await {
            Ok(()) => report.shared = true,
            Err(e) => {
                error!("Error sharing {}: {}", path.display(), e);
                report.notify(Notice::export_failed(e));
            }
        }
    }
}
