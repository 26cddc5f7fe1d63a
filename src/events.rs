use derive_more::Deref;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::iter::FromIterator;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};

/// Event text keyed by ISO date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct EventMapping(HashMap<String, String>);

impl EventMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EventMapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventRow {
    date: Option<String>,
    content: Option<String>,
}

/// Reads the CSV file at `path`. The file must have a header row naming
/// (at least) a `date` and a `content` column.
pub fn load(path: &Path) -> Result<EventMapping> {
    let file = File::open(path).map_err(|err| {
        Error::new(
            ErrorKind::EventSourceUnavailable,
            &format!("could not open '{}': {}", path.display(), err),
        )
    })?;

    let events = from_reader(file)?;
    log::info!("Loaded {} event(s) from '{}'", events.len(), path.display());

    Ok(events)
}

pub fn from_reader<R: io::Read>(reader: R) -> Result<EventMapping> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Fail on an unreadable source before looking at any row
    reader.headers()?;

    let mut events = HashMap::new();

    for row in reader.deserialize::<EventRow>() {
        match row {
            Ok(EventRow {
                date: Some(date),
                content,
            }) if !date.is_empty() => {
                events.insert(date, content.unwrap_or_default());
            }
            Ok(_) => log::debug!("Skipping event row without date"),
            Err(err) if err.is_io_error() => return Err(Error::from(err)),
            Err(err) => log::debug!("Skipping malformed event row: {}", err),
        }
    }

    Ok(EventMapping(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_date_and_content_columns() {
        let csv = "date,content\n2025-01-15,Dentist\n2025-02-01,Rent\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events.content("2025-01-15"), Some("Dentist"));
        assert_eq!(events.content("2025-02-01"), Some("Rent"));
    }

    #[test]
    fn columns_are_found_by_name() {
        let csv = "content,kind,date\nPayday,work,2025-03-31\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.content("2025-03-31"), Some("Payday"));
    }

    #[test]
    fn values_are_trimmed() {
        let csv = "date,content\n  2025-01-15 ,  Dentist  \n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.content("2025-01-15"), Some("Dentist"));
    }

    #[test]
    fn rows_without_date_are_dropped() {
        let csv = "date,content\n,orphan\n   ,blank\n2025-01-01,New Year\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events.content("2025-01-01"), Some("New Year"));
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let csv = "date,content\n2025-01-01\n2025-01-02,\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.content("2025-01-01"), Some(""));
        assert_eq!(events.content("2025-01-02"), Some(""));
    }

    #[test]
    fn last_duplicate_wins() {
        let csv = "date,content\n2025-01-01,first\n2025-01-01,second\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events.content("2025-01-01"), Some("second"));
    }

    #[test]
    fn keys_are_not_validated() {
        let csv = "date,content\n2025-02-30,never matches\n";
        let events = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(events.content("2025-02-30"), Some("never matches"));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let mut bytes = b"date,content\n2025-01-01,ok\n2025-01-02,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\n2025-01-03,also ok\n");

        let events = from_reader(bytes.as_slice()).unwrap();

        assert_eq!(events.content("2025-01-01"), Some("ok"));
        assert_eq!(events.content("2025-01-02"), None);
        assert_eq!(events.content("2025-01-03"), Some("also ok"));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "date,content").unwrap();
        writeln!(file, "2024-02-29,\"Leap, day\"").unwrap();

        let events = load(file.path()).unwrap();

        assert_eq!(events.content("2024-02-29"), Some("Leap, day"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.csv")).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::EventSourceUnavailable));
    }
}
