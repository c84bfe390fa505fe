//! Scriptable platform for development and testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::{MediaAsset, MediaLibrary, Permission, PermissionProvider, PermissionStatus, ShareSheet};
use crate::{Error, Result};

/// Records every call and answers from preset values. Album placement is
/// virtual: nothing is copied on disk.
#[derive(Debug)]
pub struct MockPlatform {
    permissions: HashMap<Permission, PermissionStatus>,
    share_available: bool,
    fail_share: AtomicBool,
    requested: Mutex<Vec<Permission>>,
    albums: Mutex<Vec<(String, MediaAsset)>>,
    shared: Mutex<Vec<PathBuf>>,
}

impl MockPlatform {
    /// Everything granted, sharing available
    pub fn new() -> Self {
        Self {
            permissions: HashMap::from([
                (Permission::Camera, PermissionStatus::Granted),
                (Permission::MediaLibrary, PermissionStatus::Granted),
            ]),
            share_available: true,
            fail_share: AtomicBool::new(false),
            requested: Mutex::new(Vec::new()),
            albums: Mutex::new(Vec::new()),
            shared: Mutex::new(Vec::new()),
        }
    }

    pub fn with_permission(mut self, permission: Permission, status: PermissionStatus) -> Self {
        self.permissions.insert(permission, status);
        self
    }

    pub fn with_share_available(mut self, available: bool) -> Self {
        self.share_available = available;
        self
    }

    /// Make `share` report a failure even though sharing is available
    pub fn fail_share(&self) {
        self.fail_share.store(true, Ordering::SeqCst);
    }

    pub async fn requested_permissions(&self) -> Vec<Permission> {
        self.requested.lock().await.clone()
    }

    /// `(album, asset)` pairs in the order they were added
    pub async fn album_assets(&self) -> Vec<(String, MediaAsset)> {
        self.albums.lock().await.clone()
    }

    pub async fn shared_files(&self) -> Vec<PathBuf> {
        self.shared.lock().await.clone()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionProvider for MockPlatform {
    async fn request(&self, permission: Permission) -> Result<PermissionStatus> {
        self.requested.lock().await.push(permission);
        Ok(self
            .permissions
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::Undetermined))
    }
}

#[async_trait]
impl MediaLibrary for MockPlatform {
    async fn create_asset(&self, file: &Path) -> Result<MediaAsset> {
        if !file.exists() {
            return Err(Error::Platform {
                reason: format!("asset source missing: {}", file.display()),
            });
        }

        Ok(MediaAsset {
            id: file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            location: file.to_path_buf(),
        })
    }

    async fn add_to_album(&self, album: &str, asset: &MediaAsset) -> Result<PathBuf> {
        self.albums
            .lock()
            .await
            .push((album.to_string(), asset.clone()));
        Ok(PathBuf::from(album).join(&asset.id))
    }
}

#[async_trait]
impl ShareSheet for MockPlatform {
    async fn is_available(&self) -> bool {
        self.share_available
    }

    async fn share(&self, file: &Path) -> Result<()> {
        if self.fail_share.load(Ordering::SeqCst) {
            return Err(Error::Platform {
                reason: "share sheet dismissed with an error".to_string(),
            });
        }
        self.shared.lock().await.push(file.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_permission_requests() {
        let platform = MockPlatform::new()
            .with_permission(Permission::MediaLibrary, PermissionStatus::Denied);

        assert!(platform.request(Permission::Camera).await.unwrap().is_granted());
        assert!(!platform.request(Permission::MediaLibrary).await.unwrap().is_granted());
        assert_eq!(
            platform.requested_permissions().await,
            vec![Permission::Camera, Permission::MediaLibrary]
        );
    }
}
