//! Scan session: camera readiness, the pending code awaiting confirmation,
//! and the dedup-and-append step that runs when the user confirms.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entry::{AppendOutcome, ScanEntry};
use crate::notice::Notice;
use crate::platform::{Permission, PermissionProvider, PermissionStatus};
use crate::store::EntryStore;
use crate::time::Clock;

/// A decoded barcode as delivered by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Symbology reported by the decoder (e.g. `ean13`, `qr`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Decoded payload
    pub data: String,
}

impl ScanEvent {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Whether the scanner may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAccess {
    Waiting,
    Granted,
    Denied,
}

/// Where the session is in the scan-confirm cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    /// A code was scanned and is waiting for the user to confirm or cancel
    Pending(String),
}

/// Result of resolving a pending scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Saved(ScanEntry),
    Duplicate(String),
    Cancelled,
    /// The entry was accepted but could not be written
    SaveFailed { code: String, reason: String },
    /// `confirm` was called with nothing pending
    NothingPending,
}

impl ScanOutcome {
    /// Notice to show for this outcome, if any
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ScanOutcome::Saved(entry) => Some(Notice::saved(&entry.code)),
            ScanOutcome::Duplicate(code) => Some(Notice::duplicate(code)),
            ScanOutcome::SaveFailed { code, reason } => Some(Notice::save_failed(code, reason)),
            ScanOutcome::Cancelled | ScanOutcome::NothingPending => None,
        }
    }
}

/// One scanning screen's worth of state
pub struct ScanSession {
    store: Arc<EntryStore>,
    clock: Arc<dyn Clock>,
    camera: CameraAccess,
    state: ScanState,
}

impl ScanSession {
    pub fn new(store: Arc<EntryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            camera: CameraAccess::Waiting,
            state: ScanState::Idle,
        }
    }

    pub fn camera_access(&self) -> CameraAccess {
        self.camera
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Whether the confirm dialog should be showing
    pub fn is_confirming(&self) -> bool {
        matches!(self.state, ScanState::Pending(_))
    }

    /// Ask for camera access. A denial produces a notice and blocks scanning.
    pub async fn request_camera(&mut self, permissions: &dyn PermissionProvider) -> Option<Notice> {
        let status = match permissions.request(Permission::Camera).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Camera permission request failed: {}", e);
                PermissionStatus::Denied
            }
        };

        self.camera = match status {
            PermissionStatus::Granted => CameraAccess::Granted,
            PermissionStatus::Denied => CameraAccess::Denied,
            PermissionStatus::Undetermined => CameraAccess::Waiting,
        };
        debug!("Camera access: {:?}", self.camera);

        (self.camera == CameraAccess::Denied).then(Notice::camera_permission_denied)
    }

    /// Take a scanner event. Returns `false` when the event is ignored because
    /// the camera is not usable or another code is awaiting confirmation.
    pub fn on_scanned(&mut self, event: ScanEvent) -> bool {
        if self.camera != CameraAccess::Granted {
            debug!("Ignoring scan of {}: camera access is {:?}", event.data, self.camera);
            return false;
        }

        if let ScanState::Pending(pending) = &self.state {
            debug!("Ignoring scan of {} while {} is pending", event.data, pending);
            return false;
        }

        debug!("Scanned {} code {}", event.kind, event.data);
        self.state = ScanState::Pending(event.data);
        true
    }

    /// Resolve the pending code. Accepting runs dedup and persists the new
    /// entry; either way the session goes back to idle.
    pub async fn confirm(&mut self, accept: bool) -> ScanOutcome {
        let code = match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::Pending(code) => code,
            ScanState::Idle => return ScanOutcome::NothingPending,
        };

        if !accept {
            debug!("Discarded scanned code {}", code);
            return ScanOutcome::Cancelled;
        }

        match self.store.append(&code, self.clock.as_ref()).await {
            Ok(AppendOutcome::Appended(entry)) => ScanOutcome::Saved(entry),
            Ok(AppendOutcome::Duplicate) => {
                info!("Rejected duplicate code {}", code);
                ScanOutcome::Duplicate(code)
            }
            Err(e) => {
                warn!("Could not persist code {}: {}", code, e);
                ScanOutcome::SaveFailed {
                    code,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use crate::platform::MockPlatform;
    use crate::storage::MemoryKvStore;
    use crate::time::FixedClock;
    use chrono::{TimeZone, Utc};

    async fn session(backend: Arc<MemoryKvStore>) -> (ScanSession, Arc<EntryStore>) {
        let store = Arc::new(EntryStore::new(backend));
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 7, 4, 10, 0, 0).unwrap()));
        let mut session = ScanSession::new(store.clone(), clock);
        assert!(session.request_camera(&MockPlatform::new()).await.is_none());
        (session, store)
    }

    #[tokio::test]
    async fn test_scan_confirm_then_duplicate() {
        let (mut session, store) = session(Arc::new(MemoryKvStore::new())).await;

        assert!(session.on_scanned(ScanEvent::new("code128", "ABC123")));
        assert!(session.is_confirming());

        let outcome = session.confirm(true).await;
        assert!(matches!(outcome, ScanOutcome::Saved(ref e) if e.code == "ABC123"));
        assert_eq!(outcome.notice().unwrap().kind, NoticeKind::Saved);
        assert_eq!(store.load().await.len(), 1);

        assert!(session.on_scanned(ScanEvent::new("code128", "ABC123")));
        let outcome = session.confirm(true).await;
        assert_eq!(outcome, ScanOutcome::Duplicate("ABC123".to_string()));
        assert_eq!(outcome.notice().unwrap().kind, NoticeKind::Duplicate);
        assert_eq!(store.load().await.len(), 1);
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_does_not_persist() {
        let (mut session, store) = session(Arc::new(MemoryKvStore::new())).await;

        session.on_scanned(ScanEvent::new("ean13", "4006381333931"));
        let outcome = session.confirm(false).await;

        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert!(outcome.notice().is_none());
        assert!(store.load().await.is_empty());
        assert!(!session.is_confirming());
    }

    #[tokio::test]
    async fn test_scans_ignored_while_pending() {
        let (mut session, _store) = session(Arc::new(MemoryKvStore::new())).await;

        assert!(session.on_scanned(ScanEvent::new("qr", "first")));
        assert!(!session.on_scanned(ScanEvent::new("qr", "second")));
        assert_eq!(session.state(), &ScanState::Pending("first".to_string()));
    }

    #[tokio::test]
    async fn test_confirm_without_pending_code() {
        let (mut session, _store) = session(Arc::new(MemoryKvStore::new())).await;
        assert_eq!(session.confirm(true).await, ScanOutcome::NothingPending);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let backend = Arc::new(MemoryKvStore::new());
        let (mut session, store) = session(backend.clone()).await;
        backend.set_fail_writes(true);

        session.on_scanned(ScanEvent::new("qr", "XYZ"));
        let outcome = session.confirm(true).await;

        assert!(matches!(outcome, ScanOutcome::SaveFailed { ref code, .. } if code == "XYZ"));
        assert_eq!(outcome.notice().unwrap().kind, NoticeKind::SaveFailed);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_denied_camera_blocks_scanning() {
        let store = Arc::new(EntryStore::new(Arc::new(MemoryKvStore::new())));
        let mut session = ScanSession::new(store, Arc::new(crate::time::SystemClock));
        let platform = MockPlatform::new().with_permission(Permission::Camera, PermissionStatus::Denied);

        assert!(!session.on_scanned(ScanEvent::new("qr", "too-early")));

        let notice = session.request_camera(&platform).await.unwrap();
        assert_eq!(notice.kind, NoticeKind::CameraPermissionDenied);
        assert_eq!(session.camera_access(), CameraAccess::Denied);
        assert!(!session.on_scanned(ScanEvent::new("qr", "blocked")));
    }
}
