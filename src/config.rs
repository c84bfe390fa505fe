//! Application configuration, stored as TOML.
//!
//! The default location is `<config dir>/barcode-ledger/config.toml`. A
//! missing file is created with defaults on first load; sections and fields
//! left out of an existing file fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::export::ExportSettings;
use crate::platform::PolicyPermissions;
use crate::store::DEFAULT_COLLECTION_KEY;
use crate::{Error, Result};

const APP_DIR: &str = "barcode-ledger";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub permissions: PermissionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the key-value files
    pub data_dir: PathBuf,
    /// Key the entry collection is stored under
    pub collection_key: String,
    /// Populate an empty list with example entries
    pub seed_examples: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where workbooks are written first
    pub documents_dir: PathBuf,
    /// Root of the shared media library; albums are subdirectories
    pub media_dir: PathBuf,
    pub album_name: String,
    pub sheet_name: String,
    /// Program used as the share sheet (e.g. `xdg-open`); unset disables sharing
    pub share_command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    pub camera: bool,
    pub media_library: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Also append logs to this file
    pub file: Option<PathBuf>,
}

fn home_or_tmp() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| home_or_tmp().join(".local/share"));
        Self {
            data_dir: base.join(APP_DIR),
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            seed_examples: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let documents = dirs::document_dir().unwrap_or_else(|| home_or_tmp().join("Documents"));
        let media = dirs::picture_dir().unwrap_or_else(|| home_or_tmp().join("Pictures"));
        Self {
            documents_dir: documents.join(APP_DIR),
            media_dir: media,
            album_name: "Excel Files".to_string(),
            sheet_name: "Barcodes".to_string(),
            share_command: None,
        }
    }
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            camera: true,
            media_library: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| Error::Configuration {
            reason: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file is written out with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = fs::read_to_string(&path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            debug!("Config file not found, creating default at {}", path.display());
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(Error::Configuration {
                reason: reason.to_string(),
            })
        };

        if self.storage.collection_key.trim().is_empty() {
            return invalid("storage.collection_key must not be empty");
        }
        if self.export.album_name.trim().is_empty() {
            return invalid("export.album_name must not be empty");
        }
        if self.export.sheet_name.trim().is_empty() {
            return invalid("export.sheet_name must not be empty");
        }
        Ok(())
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            documents_dir: self.export.documents_dir.clone(),
            album_name: self.export.album_name.clone(),
            sheet_name: self.export.sheet_name.clone(),
        }
    }

    pub fn permission_policy(&self) -> PolicyPermissions {
        PolicyPermissions {
            camera: self.permissions.camera,
            media_library: self.permissions.media_library,
        }
    }
}
