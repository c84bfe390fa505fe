//! Entry store: the persisted, canonical entry collection.
//!
//! Every operation reads or writes the whole collection under a single key.
//! Reads never fail: a missing key, a storage error or a blob that does not
//! match the entry schema all come back as an empty collection, with the
//! cause logged.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::entry::{AppendOutcome, EntryCollection};
use crate::storage::KeyValueStore;
use crate::time::Clock;
use crate::Result;

/// Key the collection is stored under
pub const DEFAULT_COLLECTION_KEY: &str = "scanned_codes";

/// Loads, saves and clears the entry collection
pub struct EntryStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    seed_examples: bool,
}

impl EntryStore {
    /// Create a store over `backend` using the default key
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: DEFAULT_COLLECTION_KEY.to_string(),
            seed_examples: false,
        }
    }

    /// Use a different key for the collection blob
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Seed example entries the first time an empty collection is listed
    pub fn with_seed_examples(mut self, seed: bool) -> Self {
        self.seed_examples = seed;
        self
    }

    /// Load the collection, falling back to empty on any failure
    pub async fn load(&self) -> EntryCollection {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored entries under '{}'", self.key);
                return EntryCollection::new();
            }
            Err(e) => {
                error!("Error reading entries from '{}': {}", self.key, e);
                return EntryCollection::new();
            }
        };

        match serde_json::from_str::<EntryCollection>(&raw) {
            Ok(entries) => {
                debug!("Loaded {} entries from '{}'", entries.len(), self.key);
                entries
            }
            Err(e) => {
                warn!("Stored entries under '{}' are malformed, ignoring them: {}", self.key, e);
                EntryCollection::new()
            }
        }
    }

    /// Load the collection, persisting the example entries first if seeding
    /// is enabled and nothing is stored yet
    pub async fn load_or_seed(&self) -> EntryCollection {
        let entries = self.load().await;
        if !entries.is_empty() || !self.seed_examples {
            return entries;
        }

        let examples = EntryCollection::examples();
        info!("Seeding '{}' with {} example entries", self.key, examples.len());
        self.save(&examples).await;
        examples
    }

    /// Serialize and overwrite the stored collection
    pub async fn try_save(&self, entries: &EntryCollection) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.backend.set(&self.key, &json).await?;
        debug!("Saved {} entries to '{}'", entries.len(), self.key);
        Ok(())
    }

    /// Like [`try_save`](Self::try_save) but only logs failures.
    /// Returns whether the collection was written.
    pub async fn save(&self, entries: &EntryCollection) -> bool {
        match self.try_save(entries).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving entries to '{}': {}", self.key, e);
                false
            }
        }
    }

    /// Drop the stored collection; later loads return empty
    pub async fn clear(&self) -> bool {
        match self.backend.remove(&self.key).await {
            Ok(()) => {
                info!("Cleared entries under '{}'", self.key);
                true
            }
            Err(e) => {
                error!("Error clearing entries under '{}': {}", self.key, e);
                false
            }
        }
    }

    /// Append `code` stamped with the clock's current time unless it is
    /// already stored. The updated collection is persisted before returning.
    pub async fn append(&self, code: &str, clock: &dyn Clock) -> Result<AppendOutcome> {
        let mut entries = self.load().await;

        let outcome = entries.append(code, clock.now());
        match &outcome {
            AppendOutcome::Appended(entry) => {
                self.try_save(&entries).await?;
                info!("Saved code {} at {}", entry.code, entry.iso_timestamp());
            }
            AppendOutcome::Duplicate => {
                debug!("Code {} already stored, not appending", code);
            }
        }

        Ok(outcome)
    }

    /// Delete the entry with exactly this code. Returns the updated
    /// collection, or `None` if no entry matched.
    pub async fn delete(&self, code: &str) -> Result<Option<EntryCollection>> {
        let mut entries = self.load().await;

        if entries.remove_code(code).is_none() {
            debug!("No entry with code {} to delete", code);
            return Ok(None);
        }

        self.try_save(&entries).await?;
        info!("Deleted code {}", code);
        Ok(Some(entries))
    }
}
