//! User-facing notices.
//!
//! Handlers never fail the process; whatever happened is reported back as a
//! list of dismissable notices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Notice severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What a notice is about, so callers can react without parsing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Saved,
    Duplicate,
    SaveFailed,
    CameraPermissionDenied,
    Deleted,
    DeleteFailed,
    Cleared,
    NothingToExport,
    Exported,
    MediaPermissionDenied,
    SharingUnavailable,
    ExportFailed,
}

/// A dismissable message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn saved(code: &str) -> Self {
        Self::new(NoticeKind::Saved, NoticeLevel::Success, "Saved", format!("Code saved: {code}"))
    }

    pub fn duplicate(code: &str) -> Self {
        Self::new(
            NoticeKind::Duplicate,
            NoticeLevel::Warning,
            "Duplicate",
            format!("Code {code} was already saved."),
        )
    }

    pub fn save_failed(code: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            NoticeKind::SaveFailed,
            NoticeLevel::Error,
            "Error",
            format!("Could not save code {code}: {reason}"),
        )
    }

    pub fn camera_permission_denied() -> Self {
        Self::new(
            NoticeKind::CameraPermissionDenied,
            NoticeLevel::Error,
            "Error",
            "Camera permission was not granted.",
        )
    }

    pub fn deleted(code: &str) -> Self {
        Self::new(
            NoticeKind::Deleted,
            NoticeLevel::Success,
            "Deleted",
            format!("Code {code} has been deleted."),
        )
    }

    pub fn delete_failed(code: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            NoticeKind::DeleteFailed,
            NoticeLevel::Error,
            "Error",
            format!("Could not delete code {code}: {reason}"),
        )
    }

    pub fn cleared() -> Self {
        Self::new(NoticeKind::Cleared, NoticeLevel::Success, "Cleared", "All codes have been deleted.")
    }

    pub fn nothing_to_export() -> Self {
        Self::new(
            NoticeKind::NothingToExport,
            NoticeLevel::Info,
            "Notice",
            "There is no data to export.",
        )
    }

    pub fn exported(location: impl fmt::Display) -> Self {
        Self::new(
            NoticeKind::Exported,
            NoticeLevel::Success,
            "Exported",
            format!("File exported and saved to: {location}"),
        )
    }

    pub fn media_permission_denied() -> Self {
        Self::new(
            NoticeKind::MediaPermissionDenied,
            NoticeLevel::Error,
            "Error",
            "Permission to access the media library was not granted.",
        )
    }

    pub fn sharing_unavailable() -> Self {
        Self::new(
            NoticeKind::SharingUnavailable,
            NoticeLevel::Info,
            "Notice",
            "Sharing is not available on this device.",
        )
    }

    pub fn export_failed(reason: impl fmt::Display) -> Self {
        Self::new(
            NoticeKind::ExportFailed,
            NoticeLevel::Error,
            "Error",
            format!("There was a problem exporting the file: {reason}"),
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
