//! List view model: the stored collection projected through a date filter.
//!
//! The store stays the source of truth. The view keeps a snapshot of it plus
//! the ephemeral filter, and recomputes the visible rows whenever either
//! changes.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::entry::{EntryCollection, ScanEntry};
use crate::notice::Notice;
use crate::store::EntryStore;

/// Ephemeral list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_date: Option<String>,
}

impl FilterState {
    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.selected_date.is_some()
    }
}

/// One displayed list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub code: String,
    pub date: String,
}

impl From<&ScanEntry> for ListRow {
    fn from(entry: &ScanEntry) -> Self {
        Self {
            code: entry.code.clone(),
            date: entry.date_part(),
        }
    }
}

/// Backs the saved-codes screen
pub struct ListViewModel {
    store: Arc<EntryStore>,
    entries: EntryCollection,
    filter: FilterState,
    visible: Vec<ScanEntry>,
}

impl ListViewModel {
    /// Load the collection (seeding examples if the store is configured to)
    pub async fn open(store: Arc<EntryStore>) -> Self {
        let entries = store.load_or_seed().await;
        let mut view = Self {
            store,
            entries,
            filter: FilterState::default(),
            visible: Vec::new(),
        };
        view.recompute();
        view
    }

    /// Re-read the store, e.g. after returning from the scan screen
    pub async fn refresh(&mut self) {
        self.entries = self.store.load().await;
        self.recompute();
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Entries passing the current filter, in stored order
    pub fn visible(&self) -> &[ScanEntry] {
        &self.visible
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.visible.iter().map(ListRow::from).collect()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Filter on a date string; `None` or `""` clears the filter
    pub fn set_filter_date(&mut self, date: Option<&str>) {
        self.filter.selected_date = date.filter(|d| !d.is_empty()).map(str::to_string);
        self.recompute();
    }

    /// Filter on a calendar day picked from a date picker
    pub fn select_date(&mut self, date: NaiveDate) {
        self.set_filter_date(Some(&date.format("%Y-%m-%d").to_string()));
    }

    pub fn clear_filter(&mut self) {
        self.set_filter_date(None);
    }

    /// Delete the entry with exactly this code from the store
    pub async fn delete(&mut self, code: &str) -> Option<Notice> {
        match self.store.delete(code).await {
            Ok(Some(updated)) => {
                self.entries = updated;
                self.recompute();
                Some(Notice::deleted(code))
            }
            Ok(None) => None,
            Err(e) => Some(Notice::delete_failed(code, e)),
        }
    }

    /// Drop every stored entry
    pub async fn clear_all(&mut self) -> Option<Notice> {
        if !self.store.clear().await {
            return None;
        }
        self.entries = EntryCollection::new();
        self.recompute();
        Some(Notice::cleared())
    }

    fn recompute(&mut self) {
        self.visible = self.entries.filtered(self.filter.selected_date());
        debug!(
            "List shows {} of {} entries (filter: {:?})",
            self.visible.len(),
            self.entries.len(),
            self.filter.selected_date()
        );
    }
}
