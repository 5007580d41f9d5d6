//! Append-only persistence for weather records.
//!
//! Records never change once written: there is no update or delete. The
//! store either lives purely in memory or is backed by a JSON-lines file,
//! one record per line, appended as ingestion happens.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Result, WeatherError};
use crate::model::{Observation, WeatherRecord};

pub struct RecordStore {
    inner: Mutex<Inner>,
}

struct Inner {
    records: Vec<WeatherRecord>,
    log: Option<File>,
}

impl RecordStore {
    /// Volatile store with no file backing.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner { records: Vec::new(), log: None }),
        }
    }

    /// Open (or create) a JSONL-backed store.
    ///
    /// Existing lines are loaded in order; a line that fails to parse is
    /// skipped with a warning rather than poisoning the whole log.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut records = Vec::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (lineno, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<WeatherRecord>(&line) {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = lineno + 1,
                            %err,
                            "skipping unreadable record line"
                        );
                    }
                }
            }
        }

        let log = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            inner: Mutex::new(Inner { records, log: Some(log) }),
        })
    }

    /// Persist a normalized observation as a new record.
    ///
    /// Assigns the next insertion-order id and stamps `fetched_at` with the
    /// current time; both are fixed for the life of the record.
    pub fn append(&self, observation: Observation) -> Result<WeatherRecord> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        let id = inner.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = WeatherRecord::from_observation(id, observation, Utc::now());

        if let Some(log) = inner.log.as_mut() {
            let line = serde_json::to_string(&record)
                .map_err(|e| WeatherError::Storage(format!("failed to encode record: {e}")))?;
            writeln!(log, "{line}")?;
            log.flush()?;
        }

        inner.records.push(record.clone());
        Ok(record)
    }

    /// Snapshot of every record in insertion order.
    pub fn all(&self) -> Vec<WeatherRecord> {
        self.inner.lock().expect("store mutex poisoned").records.clone()
    }

    pub fn get(&self, id: i64) -> Option<WeatherRecord> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn observation(city: &str) -> Observation {
        Observation {
            city: city.to_owned(),
            country: "DE".to_owned(),
            temperature: 18.5,
            feels_like: 17.2,
            humidity: 60,
            pressure: 1012,
            description: "clear sky".to_owned(),
            wind_speed: 3.4,
            visibility: Some(9000),
        }
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let store = RecordStore::in_memory();

        let a = store.append(observation("Berlin")).unwrap();
        let b = store.append(observation("Paris")).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_by_id() {
        let store = RecordStore::in_memory();
        let created = store.append(observation("Berlin")).unwrap();

        assert_eq!(store.get(created.id), Some(created));
        assert_eq!(store.get(99), None);
    }

    #[test]
    fn records_survive_a_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");

        {
            let store = RecordStore::open(&path).unwrap();
            store.append(observation("Berlin")).unwrap();
            store.append(observation("Paris")).unwrap();
        }

        let store = RecordStore::open(&path).unwrap();
        let records = store.all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city, "Berlin");
        assert_eq!(records[1].city, "Paris");

        // Ids keep counting past the loaded records.
        let next = store.append(observation("Oslo")).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn unreadable_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");

        {
            let store = RecordStore::open(&path).unwrap();
            store.append(observation("Berlin")).unwrap();
        }

        let mut contents = fs::read_to_string(&path).unwrap();
        contents.push_str("this is not a record\n");
        fs::write(&path, contents).unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/records.jsonl");

        let store = RecordStore::open(&path).unwrap();
        store.append(observation("Berlin")).unwrap();

        assert!(path.exists());
    }
}
