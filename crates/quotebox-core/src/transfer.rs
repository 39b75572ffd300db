//! Import and export of quote documents
//!
//! An export document is a pretty-printed JSON array of `{text, category}`
//! objects, the same shape as the persisted snapshot. Importing reads the
//! same shape back, validating each element on its own.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;
use crate::storage::persistence::atomic_write;
use crate::storage::{Access, StorageError};
use crate::store::{QuoteStore, StoreEvent};

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    /// Elements appended to the store
    pub added: usize,
    /// Elements that failed validation
    pub skipped: usize,
}

/// Serialize the whole store as a pretty-printed JSON array
pub fn export_all(store: &QuoteStore) -> QuoteResult<String> {
    Ok(serde_json::to_string_pretty(store.quotes())?)
}

/// File name for an export taken at `now`
///
/// `quotes-export-2024-05-01T12-30-45-123Z.json`: an ISO 8601 UTC timestamp
/// with colons and dots replaced by hyphens.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("quotes-export-{}.json", stamp)
}

/// Write an export document into `dir` and return its path
pub fn write_export(store: &QuoteStore, dir: &Path) -> QuoteResult<PathBuf> {
    let document = export_all(store)?;
    let path = dir.join(export_file_name(Utc::now()));

    atomic_write(&path, document.as_bytes())?;
    info!("Exported {} quote(s) to {:?}", store.len(), path);
    Ok(path)
}

/// Append the valid quotes of an import document to the store
///
/// Fails with [`QuoteError::Format`] if the document is not JSON or its top
/// level is not an array. Invalid elements are skipped. Imported quotes are
/// not checked against existing ones, so an import can add duplicates. The
/// store is saved only when something was added.
pub fn import_from(store: &mut QuoteStore, document: &str) -> QuoteResult<ImportReport> {
    let value: Value = serde_json::from_str(document)?;
    let Value::Array(items) = value else {
        return Err(QuoteError::Format(
            "import file must contain a JSON array of quotes".to_string(),
        ));
    };

    let mut report = ImportReport::default();
    let mut new_categories = Vec::new();

    for item in &items {
        match Quote::from_value(item) {
            Some(quote) => {
                if let Some(category) = store.append(quote) {
                    new_categories.push(category);
                }
                report.added += 1;
            }
            None => {
                debug!("Skipping invalid import element: {}", item);
                report.skipped += 1;
            }
        }
    }

    if report.added > 0 {
        store.save();
        store.emit(StoreEvent::Imported {
            added: report.added,
            new_categories,
        });
    }

    info!(
        "Imported {} quote(s), skipped {}",
        report.added, report.skipped
    );
    Ok(report)
}

/// Read an import document from disk and apply it
///
/// A file that is not UTF-8 text is a [`QuoteError::Format`] like any other
/// undecodable document.
pub fn import_file(store: &mut QuoteStore, path: &Path) -> QuoteResult<ImportReport> {
    let document = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => {
            QuoteError::Format(format!("{} is not UTF-8 text", path.display()))
        }
        _ => StorageError::from_io(e, path.to_path_buf(), Access::Read).into(),
    })?;
    import_from(store, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_quotes;
    use crate::storage::{FileStorage, KeyValueStore, MemoryStorage, QUOTES_KEY};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> QuoteStore {
        QuoteStore::open(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_export_is_pretty_array() {
        let store = store();
        let document = export_all(&store).unwrap();

        assert!(document.starts_with('['));
        assert!(document.contains('\n'));
        let parsed: Vec<Quote> = serde_json::from_str(&document).unwrap();
        assert_eq!(parsed, default_quotes());
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 45)
            .unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(
            export_file_name(now),
            "quotes-export-2024-05-01T12-30-45-123Z.json"
        );
    }

    #[test]
    fn test_write_export() {
        let temp_dir = TempDir::new().unwrap();
        let store = store();

        let path = write_export(&store, temp_dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("quotes-export-"));
        assert!(name.ends_with(".json"));

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, export_all(&store).unwrap());
    }

    #[test]
    fn test_import_skips_invalid_elements() {
        let mut store = store();
        let report = import_from(
            &mut store,
            r#"[
                {"text": "Good", "category": "Fine"},
                {"text": "Missing category"},
                {"category": "Missing text"},
                {"text": ["not", "a", "string"], "category": "Bad"},
                7
            ]"#,
        )
        .unwrap();

        assert_eq!(report, ImportReport { added: 1, skipped: 4 });
        assert_eq!(store.len(), 4);
        assert_eq!(store.quotes()[3].text, "Good");
    }

    #[test]
    fn test_import_rejects_non_array() {
        let mut store = store();
        let result = import_from(&mut store, r#"{"text": "Hi", "category": "A"}"#);
        assert!(matches!(result, Err(QuoteError::Format(_))));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let mut store = store();
        assert!(matches!(
            import_from(&mut store, "[{"),
            Err(QuoteError::Format(_))
        ));
    }

    #[test]
    fn test_import_nothing_valid_is_zero_not_error() {
        let mut store = store();
        let mut events = store.subscribe();

        let report = import_from(&mut store, r#"[{"nope": true}]"#).unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.skipped, 1);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_import_does_not_save_when_nothing_added() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let mut store = QuoteStore::open(Box::new(storage.clone()));

        import_from(&mut store, "[]").unwrap();
        assert!(storage.get(QUOTES_KEY).unwrap().is_none());

        import_from(&mut store, r#"[{"text": "Saved", "category": "Now"}]"#).unwrap();
        assert!(storage.get(QUOTES_KEY).unwrap().unwrap().contains("Saved"));
    }

    #[test]
    fn test_export_then_import_doubles_store() {
        let mut store = store();
        let document = export_all(&store).unwrap();

        let report = import_from(&mut store, &document).unwrap();
        assert_eq!(report.added, 3);
        assert_eq!(store.len(), 6);
        for quote in default_quotes() {
            assert!(store.contains_text(&quote.text));
        }
    }

    #[test]
    fn test_export_with_added_quote_into_fresh_store() {
        let mut source = store();
        source.add("Stay hungry.", "Motivation").unwrap();
        let document = export_all(&source).unwrap();

        let mut fresh = store();
        import_from(&mut fresh, &document).unwrap();
        assert_eq!(fresh.len(), 7);
    }

    #[test]
    fn test_import_emits_new_categories() {
        let mut store = store();
        let mut events = store.subscribe();

        import_from(
            &mut store,
            r#"[{"text": "A", "category": "Fresh"}, {"text": "B", "category": "Motivation"}]"#,
        )
        .unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Imported {
                added: 2,
                new_categories: vec!["Fresh".to_string()],
            }
        );
    }

    #[test]
    fn test_import_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store();
        let result = import_file(&mut store, &temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(QuoteError::Storage(_))));
    }

    #[test]
    fn test_import_file_not_utf8_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.json");
        std::fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

        let mut store = store();
        let result = import_file(&mut store, &path);

        assert!(matches!(result, Err(QuoteError::Format(_))));
        assert_eq!(store.len(), 3);
    }
}
