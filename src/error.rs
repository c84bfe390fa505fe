//! Error types for barcode-ledger

use thiserror::Error;

/// Main error type for barcode-ledger operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Storage error for key '{key}': {reason}")]
    Storage { key: String, reason: String },

    #[error("Workbook encoding failed: {0}")]
    Workbook(#[from] zip::result::ZipError),

    #[error("Platform capability failed: {reason}")]
    Platform { reason: String },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

/// Result type alias for barcode-ledger operations
pub type Result<T> = std::result::Result<T, Error>;
