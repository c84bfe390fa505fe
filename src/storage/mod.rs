//! Key-value persistence capability.
//!
//! The entry store only needs whole-value get/set/remove by key. Two
//! providers are available: a directory of JSON files for the command-line
//! tool and an in-memory map for tests and embedding.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::Result;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

/// Async key-value store holding opaque string values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if it was never written or was removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
