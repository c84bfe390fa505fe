//! Desktop stand-ins for the device capabilities.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{MediaAsset, MediaLibrary, Permission, PermissionProvider, PermissionStatus, ShareSheet};
use crate::{Error, Result};

/// Answers permission requests from a fixed policy (usually the config file)
#[derive(Debug, Clone, Copy)]
pub struct PolicyPermissions {
    pub camera: bool,
    pub media_library: bool,
}

impl Default for PolicyPermissions {
    fn default() -> Self {
        Self {
            camera: true,
            media_library: true,
        }
    }
}

#[async_trait]
impl PermissionProvider for PolicyPermissions {
    async fn request(&self, permission: Permission) -> Result<PermissionStatus> {
        let granted = match permission {
            Permission::Camera => self.camera,
            Permission::MediaLibrary => self.media_library,
        };

        debug!("Permission request for {}: granted={}", permission, granted);
        Ok(if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}

/// Assets wait here until they are placed in an album
const STAGING_DIR: &str = ".staging";

/// Media library backed by a directory; albums are subdirectories
#[derive(Debug, Clone)]
pub struct LocalMediaLibrary {
    root: PathBuf,
}

impl LocalMediaLibrary {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl MediaLibrary for LocalMediaLibrary {
    async fn create_asset(&self, file: &Path) -> Result<MediaAsset> {
        let file_name = file.file_name().ok_or_else(|| Error::Platform {
            reason: format!("not a file: {}", file.display()),
        })?;

        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&staging).await?;
        let location = staging.join(file_name);
        fs::copy(file, &location).await?;

        debug!("Created media asset {}", location.display());
        Ok(MediaAsset {
            id: file_name.to_string_lossy().into_owned(),
            location,
        })
    }

    async fn add_to_album(&self, album: &str, asset: &MediaAsset) -> Result<PathBuf> {
        if album.is_empty() || album.contains(['/', '\\']) || album == ".." {
            return Err(Error::Platform {
                reason: format!("invalid album name: {album:?}"),
            });
        }

        let album_dir = self.root.join(album);
        fs::create_dir_all(&album_dir).await?;

        let destination = album_dir.join(&asset.id);
        fs::rename(&asset.location, &destination).await?;

        info!("Added {} to album '{}'", asset.id, album);
        Ok(destination)
    }
}

/// Share sheet that is never available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareSheet;

#[async_trait]
impl ShareSheet for NoShareSheet {
    async fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, file: &Path) -> Result<()> {
        Err(Error::Platform {
            reason: format!("no share facility for {}", file.display()),
        })
    }
}

/// Shares a file by handing it to an external program such as `xdg-open`
#[cfg(feature = "share")]
#[derive(Debug, Clone)]
pub struct CommandShareSheet {
    program: String,
}

#[cfg(feature = "share")]
impl CommandShareSheet {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[cfg(feature = "share")]
#[async_trait]
impl ShareSheet for CommandShareSheet {
    async fn is_available(&self) -> bool {
        !self.program.trim().is_empty()
    }

    async fn share(&self, file: &Path) -> Result<()> {
        info!("Sharing {} with {}", file.display(), self.program);

        let status = tokio::process::Command::new(&self.program)
            .arg(file)
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Platform {
                reason: format!("{} exited with {}", self.program, status),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_policy_permissions() {
        let policy = PolicyPermissions {
            camera: true,
            media_library: false,
        };

        assert_eq!(policy.request(Permission::Camera).await.unwrap(), PermissionStatus::Granted);
        assert_eq!(
            policy.request(Permission::MediaLibrary).await.unwrap(),
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_asset_moves_into_album() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("barcodes_2024-05-01.xlsx");
        tokio::fs::write(&source, b"workbook").await.unwrap();

        let library = LocalMediaLibrary::new(&temp_dir.path().join("media"));
        let asset = library.create_asset(&source).await.unwrap();
        let placed = library.add_to_album("Excel Files", &asset).await.unwrap();

        assert_eq!(placed, temp_dir.path().join("media/Excel Files/barcodes_2024-05-01.xlsx"));
        assert!(placed.exists());
        assert!(!asset.location.exists());
        // the original stays where the export wrote it
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_same_named_file_in_media_root_is_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let media = temp_dir.path().join("media");
        tokio::fs::create_dir_all(&media).await.unwrap();
        let existing = media.join("barcodes_2024-05-01.xlsx");
        tokio::fs::write(&existing, b"user file").await.unwrap();

        let source = temp_dir.path().join("barcodes_2024-05-01.xlsx");
        tokio::fs::write(&source, b"workbook").await.unwrap();

        let library = LocalMediaLibrary::new(&media);
        let asset = library.create_asset(&source).await.unwrap();
        let placed = library.add_to_album("Excel Files", &asset).await.unwrap();

        assert_eq!(tokio::fs::read(&existing).await.unwrap(), b"user file");
        assert_eq!(tokio::fs::read(&placed).await.unwrap(), b"workbook");
    }

    #[tokio::test]
    async fn test_album_name_cannot_escape_root() {
        let temp_dir = TempDir::new().unwrap();
        let library = LocalMediaLibrary::new(temp_dir.path());
        let asset = MediaAsset {
            id: "x.xlsx".to_string(),
            location: temp_dir.path().join("x.xlsx"),
        };

        assert!(library.add_to_album("../elsewhere", &asset).await.is_err());
    }

    #[tokio::test]
    async fn test_no_share_sheet() {
        let sheet = NoShareSheet;
        assert!(!sheet.is_available().await);
        assert!(sheet.share(Path::new("x.xlsx")).await.is_err());
    }

    #[cfg(feature = "share")]
    #[tokio::test]
    async fn test_command_share_sheet_availability() {
        assert!(CommandShareSheet::new("xdg-open").is_available().await);
        assert!(!CommandShareSheet::new("  ").is_available().await);
    }
}
