//! Scan entries and the ordered collection they live in.
//!
//! The collection is persisted as a JSON array of `{ "code", "date" }`
//! objects. Parsing goes through serde, so a blob with a missing field or an
//! unparseable timestamp is rejected as a whole.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One recorded barcode scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Decoded barcode payload, treated as opaque text
    pub code: String,
    /// Capture time, set once when the scan is confirmed
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ScanEntry {
    pub fn new(code: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            timestamp,
        }
    }

    /// ISO-8601 timestamp with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Date portion of the ISO timestamp (`YYYY-MM-DD`)
    pub fn date_part(&self) -> String {
        self.iso_timestamp()
            .split('T')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// Result of trying to append a code to a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(ScanEntry),
    Duplicate,
}

/// Ordered list of scan entries, oldest first, with unique codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryCollection {
    entries: Vec<ScanEntry>,
}

impl EntryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries shown on a fresh install when seeding is enabled
    pub fn examples() -> Self {
        let at = |y, m, d, h| {
            Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
                .single()
                .unwrap_or_default()
        };

        Self {
            entries: vec![
                ScanEntry::new("7501055363057", at(2024, 10, 1, 9)),
                ScanEntry::new("7501000111206", at(2024, 10, 1, 15)),
                ScanEntry::new("0036000291452", at(2024, 10, 2, 11)),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ScanEntry] {
        &self.entries
    }

    /// Exact, case-sensitive match against every stored code
    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.iter().any(|entry| entry.code == code)
    }

    /// Append `code` stamped with `timestamp` unless the code is already present
    pub fn append(&mut self, code: &str, timestamp: DateTime<Utc>) -> AppendOutcome {
        if self.contains_code(code) {
            return AppendOutcome::Duplicate;
        }

        let entry = ScanEntry::new(code, timestamp);
        self.entries.push(entry.clone());
        AppendOutcome::Appended(entry)
    }

    /// Remove the first entry whose code matches exactly
    pub fn remove_code(&mut self, code: &str) -> Option<ScanEntry> {
        let index = self.entries.iter().position(|entry| entry.code == code)?;
        Some(self.entries.remove(index))
    }

    /// Entries whose ISO timestamp contains `date`. `None` or `""` keeps everything.
    pub fn filtered(&self, date: Option<&str>) -> Vec<ScanEntry> {
        match date.filter(|d| !d.is_empty()) {
            Some(date) => self
                .entries
                .iter()
                .filter(|entry| entry.iso_timestamp().contains(date))
                .cloned()
                .collect(),
            None => self.entries.clone(),
        }
    }
}

impl From<Vec<ScanEntry>> for EntryCollection {
    fn from(entries: Vec<ScanEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a EntryCollection {
    type Item = &'a ScanEntry;
    type IntoIter = std::slice::Iter<'a, ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 30, 0).unwrap()
    }

    fn sample() -> EntryCollection {
        EntryCollection::from(vec![
            ScanEntry::new("A1", ts(1, 8)),
            ScanEntry::new("B2", ts(2, 9)),
            ScanEntry::new("C3", ts(2, 17)),
        ])
    }

    #[test]
    fn test_append_new_code() {
        let mut entries = sample();
        let outcome = entries.append("D4", ts(3, 10));

        assert_eq!(outcome, AppendOutcome::Appended(ScanEntry::new("D4", ts(3, 10))));
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.as_slice().last().unwrap().code, "D4");
    }

    #[test]
    fn test_append_duplicate_leaves_collection_unchanged() {
        let mut entries = sample();
        let before = entries.clone();

        assert_eq!(entries.append("B2", ts(4, 10)), AppendOutcome::Duplicate);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut entries = sample();
        assert!(matches!(entries.append("a1", ts(4, 10)), AppendOutcome::Appended(_)));
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_filter_by_date() {
        let entries = sample();
        let codes: Vec<_> = entries
            .filtered(Some("2024-05-02"))
            .into_iter()
            .map(|e| e.code)
            .collect();

        assert_eq!(codes, vec!["B2", "C3"]);
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let entries = sample();
        assert_eq!(entries.filtered(Some("")), entries.as_slice().to_vec());
        assert_eq!(entries.filtered(None), entries.as_slice().to_vec());
    }

    #[test]
    fn test_filter_without_matches() {
        let entries = sample();
        assert!(entries.filtered(Some("1999-01-01")).is_empty());
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_remove_code() {
        let mut entries = sample();

        let removed = entries.remove_code("B2").unwrap();
        assert_eq!(removed.code, "B2");
        assert_eq!(entries.len(), 2);

        assert!(entries.remove_code("missing").is_none());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_wire_format_uses_date_field() {
        let entries = EntryCollection::from(vec![ScanEntry::new("ABC123", ts(1, 8))]);
        let json = serde_json::to_value(&entries).unwrap();

        assert_eq!(json[0]["code"], "ABC123");
        assert!(json[0]["date"].as_str().unwrap().starts_with("2024-05-01T08:30:00"));
    }

    #[test]
    fn test_parses_javascript_iso_strings() {
        let json = r#"[{"code":"X","date":"2024-09-30T22:15:04.123Z"}]"#;
        let entries: EntryCollection = serde_json::from_str(json).unwrap();

        assert_eq!(entries.as_slice()[0].iso_timestamp(), "2024-09-30T22:15:04.123Z");
        assert_eq!(entries.as_slice()[0].date_part(), "2024-09-30");
    }

    #[test]
    fn test_rejects_malformed_entries() {
        assert!(serde_json::from_str::<EntryCollection>(r#"[{"code":"X"}]"#).is_err());
        assert!(serde_json::from_str::<EntryCollection>(r#"[{"code":"X","date":"yesterday"}]"#).is_err());
        assert!(serde_json::from_str::<EntryCollection>(r#"{"code":"X"}"#).is_err());
    }

    #[test]
    fn test_examples_have_unique_codes() {
        let examples = EntryCollection::examples();
        let mut rebuilt = EntryCollection::new();
        for entry in &examples {
            assert!(matches!(
                rebuilt.append(&entry.code, entry.timestamp),
                AppendOutcome::Appended(_)
            ));
        }
        assert_eq!(rebuilt, examples);
    }
}
