//! Platform capabilities consumed by the scan and export pipelines.
//!
//! Permission prompts, the shared media library and the native share sheet
//! are device facilities. They are modelled as async traits so the pipelines
//! can run against the desktop implementations in [`desktop`] or the
//! scriptable [`mock::MockPlatform`].

pub mod desktop;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

pub use desktop::{LocalMediaLibrary, NoShareSheet, PolicyPermissions};
#[cfg(feature = "share")]
pub use desktop::CommandShareSheet;
pub use mock::MockPlatform;

/// Permissions the app asks the user for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Camera,
    MediaLibrary,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Camera => write!(f, "camera"),
            Permission::MediaLibrary => write!(f, "media library"),
        }
    }
}

/// Answer to a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Prompts the user for a permission
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request(&self, permission: Permission) -> Result<PermissionStatus>;
}

/// A file registered with the shared media library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: String,
    pub location: PathBuf,
}

/// The user's shared media location (gallery, albums)
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Copy `file` into the library
    async fn create_asset(&self, file: &Path) -> Result<MediaAsset>;

    /// Move `asset` into the album `album`, creating the album if needed.
    /// Returns where the asset ended up.
    async fn add_to_album(&self, album: &str, asset: &MediaAsset) -> Result<PathBuf>;
}

/// The platform's native share facility
#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn is_available(&self) -> bool;

    async fn share(&self, file: &Path) -> Result<()>;
}
