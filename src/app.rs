//! Wires the configured capabilities into the store and pipelines.

use std::sync::Arc;
use tracing::debug;

use crate::config::AppConfig;
use crate::export::ExportPipeline;
use crate::platform::{LocalMediaLibrary, MediaLibrary, NoShareSheet, PermissionProvider, ShareSheet};
use crate::scan::ScanSession;
use crate::storage::{FileKvStore, KeyValueStore};
use crate::store::EntryStore;
use crate::time::{Clock, SystemClock};
use crate::view::ListViewModel;

/// Everything a command handler needs, built once per run
pub struct Ledger {
    pub store: Arc<EntryStore>,
    pub permissions: Arc<dyn PermissionProvider>,
    pub clock: Arc<dyn Clock>,
    export: ExportPipeline,
}

impl Ledger {
    /// Build from the desktop capabilities described by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let backend: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::new(&config.storage.data_dir));
        let permissions: Arc<dyn PermissionProvider> = Arc::new(config.permission_policy());
        let media: Arc<dyn MediaLibrary> = Arc::new(LocalMediaLibrary::new(&config.export.media_dir));
        let share = share_sheet(config.export.share_command.as_deref());

        debug!(
            "Using data dir {} and documents dir {}",
            config.storage.data_dir.display(),
            config.export.documents_dir.display()
        );

        Self::new(config, backend, permissions, media, share, Arc::new(SystemClock))
    }

    /// Build from explicit capabilities
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn KeyValueStore>,
        permissions: Arc<dyn PermissionProvider>,
        media: Arc<dyn MediaLibrary>,
        share: Arc<dyn ShareSheet>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(
            EntryStore::new(backend)
                .with_key(config.storage.collection_key.clone())
                .with_seed_examples(config.storage.seed_examples),
        );

        let export = ExportPipeline::new(
            config.export_settings(),
            permissions.clone(),
            media,
            share,
            clock.clone(),
        );

        Self {
            store,
            permissions,
            clock,
            export,
        }
    }

    /// A scan session that has already asked for camera access
    pub async fn scan_session(&self) -> (ScanSession, Option<crate::notice::Notice>) {
        let mut session = ScanSession::new(self.store.clone(), self.clock.clone());
        let notice = session.request_camera(self.permissions.as_ref()).await;
        (session, notice)
    }

    pub async fn list_view(&self) -> ListViewModel {
        ListViewModel::open(self.store.clone()).await
    }

    pub fn export(&self) -> &ExportPipeline {
        &self.export
    }
}

#[cfg(feature = "share")]
fn share_sheet(command: Option<&str>) -> Arc<dyn ShareSheet> {
    match command {
        Some(program) => Arc::new(crate::platform::CommandShareSheet::new(program)),
        None => Arc::new(NoShareSheet),
    }
}

#[cfg(not(feature = "share"))]
fn share_sheet(_command: Option<&str>) -> Arc<dyn ShareSheet> {
    Arc::new(NoShareSheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use crate::platform::MockPlatform;
    use crate::scan::{ScanEvent, ScanOutcome};
    use crate::storage::MemoryKvStore;
    use tempfile::TempDir;

    fn ledger(config: &AppConfig, platform: Arc<MockPlatform>) -> Ledger {
        Ledger::new(
            config,
            Arc::new(MemoryKvStore::new()),
            platform.clone(),
            platform.clone(),
            platform,
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_scan_list_export_flow() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.export.documents_dir = temp_dir.path().to_path_buf();
        let platform = Arc::new(MockPlatform::new());
        let ledger = ledger(&config, platform.clone());

        let (mut session, notice) = ledger.scan_session().await;
        assert!(notice.is_none());

        for code in ["ABC123", "ABC123", "XYZ789"] {
            session.on_scanned(ScanEvent::new("code128", code));
            session.confirm(true).await;
        }

        let mut view = ledger.list_view().await;
        assert_eq!(view.total(), 2);

        let today = ledger.clock.today().format("%Y-%m-%d").to_string();
        view.set_filter_date(Some(&today));
        let report = ledger
            .export()
            .export(view.visible(), view.filter().selected_date())
            .await;

        let file = temp_dir.path().join(format!("barcodes_{today}.xlsx"));
        assert_eq!(report.file.as_deref(), Some(file.as_path()));
        assert_eq!(report.notices[0].kind, NoticeKind::Exported);
        assert_eq!(platform.shared_files().await, vec![file]);
    }

    #[tokio::test]
    async fn test_from_config_persists_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_dir = temp_dir.path().join("data");
        config.export.documents_dir = temp_dir.path().join("docs");
        config.export.media_dir = temp_dir.path().join("media");

        let ledger = Ledger::from_config(&config);
        ledger.store.append("ABC123", &SystemClock).await.unwrap();

        assert!(temp_dir.path().join("data/scanned_codes.json").exists());
    }

    #[tokio::test]
    async fn test_duplicate_scenario() {
        let ledger = ledger(&AppConfig::default(), Arc::new(MockPlatform::new()));
        let (mut session, _) = ledger.scan_session().await;

        session.on_scanned(ScanEvent::new("ean13", "ABC123"));
        assert!(matches!(session.confirm(true).await, ScanOutcome::Saved(_)));

        session.on_scanned(ScanEvent::new("ean13", "ABC123"));
        assert!(matches!(session.confirm(true).await, ScanOutcome::Duplicate(_)));

        assert_eq!(ledger.store.load().await.len(), 1);
    }
}
