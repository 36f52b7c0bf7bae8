// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Load/save boundary between the entry store and a JSON timesheet file.
//!
//! Responsibilities:
//! - Map the on-disk document to validated [`TimesheetEntry`] values.
//! - Write through a sibling temporary file so a failed save never truncates the
//!   previous timesheet.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Summary, TimesheetEntry, TimesheetStore};

/// Failures crossing the filesystem boundary.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Timesheet file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Malformed timesheet file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid entry #{} in {}: {reason}", .index + 1, .path.display())]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        reason: String,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whole-file document; the totals are informational and recomputed on load.
#[derive(Debug, Serialize, Deserialize)]
struct TimesheetDocument {
    entries: Vec<EntryRecord>,
    #[serde(default)]
    total_time: f64,
    #[serde(default)]
    billable_time: f64,
    #[serde(default)]
    expected_time_offset: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    date: NaiveDate,
    #[serde(rename = "time")]
    hours: f64,
    #[serde(default)]
    project: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default = "default_billable")]
    billable: bool,
}

fn default_billable() -> bool {
    true
}

impl From<&TimesheetEntry> for EntryRecord {
    fn from(entry: &TimesheetEntry) -> Self {
        Self {
            date: entry.date,
            hours: entry.hours,
            project: entry.project.clone(),
            description: entry.description.clone(),
            timestamp: entry.timestamp.clone(),
            billable: entry.billable,
        }
    }
}

impl From<EntryRecord> for TimesheetEntry {
    fn from(record: EntryRecord) -> Self {
        Self {
            date: record.date,
            description: record.description,
            hours: record.hours,
            project: record.project,
            billable: record.billable,
            timestamp: record.timestamp,
        }
    }
}

/// Read a timesheet file into a new store.
///
/// # Errors
///
/// - [`PersistError::NotFound`] when `path` does not exist; callers treat this as an empty store.
/// - [`PersistError::Parse`] when the content is not a timesheet document.
/// - [`PersistError::InvalidEntry`] when an entry carries negative or non-finite hours.
/// - [`PersistError::Io`] for any other read failure.
pub fn load(path: &Path) -> Result<TimesheetStore, PersistError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(PersistError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(PersistError::io(path, err)),
    };

    let document: TimesheetDocument =
        serde_json::from_str(&content).map_err(|source| PersistError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::with_capacity(document.entries.len());
    for (index, record) in document.entries.into_iter().enumerate() {
        let entry = TimesheetEntry::from(record);
        if !entry.has_valid_hours() {
            return Err(PersistError::InvalidEntry {
                path: path.to_path_buf(),
                index,
                reason: format!("hours must be a non-negative number, found {}", entry.hours),
            });
        }
        entries.push(entry);
    }

    log::info!("loaded {} entries from {}", entries.len(), path.display());
    Ok(TimesheetStore::from_entries(entries))
}

/// Write `store` to `path`, replacing any previous file only once the new content is on disk.
///
/// Parent directories are created when missing. On failure the temporary file is removed
/// and the previous file at `path` is left untouched.
pub fn save(path: &Path, store: &TimesheetStore, lunch_project: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }

    let summary = Summary::compute(store.list(), lunch_project);
    let document = TimesheetDocument {
        entries: store.list().iter().map(EntryRecord::from).collect(),
        total_time: summary.total_time,
        billable_time: summary.billable_time,
        expected_time_offset: summary.expected_time_offset,
    };

    let tmp = temp_path_for(path);
    if let Err(err) = write_document(&tmp, &document) {
        let _ = fs::remove_file(&tmp);
        return Err(PersistError::io(path, err));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(PersistError::io(path, err));
    }

    log::info!("saved {} entries to {}", store.len(), path.display());
    Ok(())
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps an existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

/// Serialize into `tmp`; the handle is flushed, synced and closed before returning.
fn write_document(tmp: &Path, document: &TimesheetDocument) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(tmp)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "timesheet".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TimesheetEntry {
        TimesheetEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "Project A",
            7.5,
            "kdg",
            true,
        )
    }

    #[test]
    fn save_then_load_round_trips_single_entry() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sheet.json");
        let mut store = TimesheetStore::new();
        store.add(sample());

        save(&path, &store, "lunch").unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.list(), store.list());
        assert_eq!(loaded.list()[0].description, "Project A");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn round_trip_keeps_order_and_flags() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/sheet.json");
        let mut store = TimesheetStore::new();
        store.add(sample());
        let mut lunch = sample();
        lunch.project = "Lunch".into();
        lunch.hours = 0.5;
        lunch.billable = false;
        store.add(lunch);

        save(&path, &store, "lunch").unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn saved_document_carries_totals() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sheet.json");
        let mut store = TimesheetStore::new();
        store.add(sample());

        save(&path, &store, "lunch").unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(raw["total_time"], 7.5);
        assert_eq!(raw["billable_time"], 7.5);
        assert_eq!(raw["expected_time_offset"], 0.0);
        assert_eq!(raw["entries"][0]["time"], 7.5);
        assert_eq!(raw["entries"][0]["date"], "2024-01-05");
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();

        let err = load(&tmp.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, PersistError::NotFound(_)));
    }

    #[test]
    fn malformed_content_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load(&path), Err(PersistError::Parse { .. })));
    }

    #[test]
    fn invalid_date_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad_date.json");
        fs::write(
            &path,
            r#"{"entries":[{"date":"2024-02-30","time":1.0,"project":"kdg"}]}"#,
        )
        .unwrap();

        assert!(matches!(load(&path), Err(PersistError::Parse { .. })));
    }

    #[test]
    fn negative_hours_are_rejected_on_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("negative.json");
        fs::write(
            &path,
            r#"{"entries":[{"date":"2024-01-05","time":1.0},{"date":"2024-01-05","time":-2.0}]}"#,
        )
        .unwrap();

        match load(&path) {
            Err(PersistError::InvalidEntry { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("minimal.json");
        fs::write(&path, r#"{"entries":[{"date":"2024-01-05","time":2.0}]}"#).unwrap();

        let store = load(&path).unwrap();
        let entry = &store.list()[0];

        assert!(entry.billable);
        assert!(entry.project.is_empty());
        assert!(entry.timestamp.is_empty());
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sheet.json");
        fs::write(&path, "previous").unwrap();
        // A directory squatting on the temp name makes the write fail.
        fs::create_dir(temp_path_for(&path)).unwrap();

        let mut store = TimesheetStore::new();
        store.add(sample());
        let err = save(&path, &store, "lunch").unwrap_err();

        assert!(matches!(err, PersistError::Io { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn ensure_extension_appends_or_keeps() {
        assert_eq!(
            ensure_extension(PathBuf::from("week"), "json"),
            PathBuf::from("week.json")
        );
        assert_eq!(
            ensure_extension(PathBuf::from("week.JSON"), "json"),
            PathBuf::from("week.JSON")
        );
        assert_eq!(
            ensure_extension(PathBuf::from("week.txt"), "json"),
            PathBuf::from("week.json")
        );
    }
}
