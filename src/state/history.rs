//! Capped, newest-first list of finished processing runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use uuid::Uuid;

use super::{ProcessingMode, TaskStatus};
use crate::constants::HISTORY_CAPACITY;
use crate::core::history_store::HistoryStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub filename: String,
    pub task_id: String,
    pub mode: ProcessingMode,
    pub pitch_shift: f64,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when recording a run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProjectRecord {
    pub filename: String,
    pub task_id: String,
    pub mode: ProcessingMode,
    pub pitch_shift: f64,
    pub status: TaskStatus,
}

/// History list backed by an injected store. Every mutation rewrites the store.
pub struct ProjectHistory<S: HistoryStore> {
    store: S,
    records: Vec<ProjectRecord>,
}

impl<S: HistoryStore> ProjectHistory<S> {
    /// Load from the store. An unreadable store starts empty.
    pub fn open(store: S) -> Self {
        let records = match store.load() {
            Ok(mut records) => {
                records.truncate(HISTORY_CAPACITY);
                records
            }
            Err(err) => {
                tracing::warn!("Failed to load project history: {}", err);
                Vec::new()
            }
        };
        Self { store, records }
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn add(&mut self, record: NewProjectRecord) -> io::Result<&ProjectRecord> {
        let entry = ProjectRecord {
            id: Uuid::new_v4(),
            filename: record.filename,
            task_id: record.task_id,
            mode: record.mode,
            pitch_shift: record.pitch_shift,
            status: record.status,
            created_at: Utc::now(),
        };
        self.records.insert(0, entry);
        self.records.truncate(HISTORY_CAPACITY);
        self.store.save(&self.records)?;
        Ok(&self.records[0])
    }

    pub fn delete(&mut self, id: Uuid) -> io::Result<bool> {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;
        self.store.save(&self.records)?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.records.clear();
        self.store.save(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history_store::MemoryHistoryStore;

    fn record(n: usize) -> NewProjectRecord {
        NewProjectRecord {
            filename: format!("clip_{}.mp4", n),
            task_id: format!("task-{}", n),
            mode: ProcessingMode::Ai,
            pitch_shift: -3.0,
            status: TaskStatus::Completed,
        }
    }

    #[test]
    fn test_newest_first_and_capped() {
        let store = MemoryHistoryStore::default();
        let mut history = ProjectHistory::open(store.clone());
        for n in 0..25 {
            history.add(record(n)).unwrap();
        }
        assert_eq!(history.records().len(), HISTORY_CAPACITY);
        assert_eq!(history.records()[0].task_id, "task-24");
        assert_eq!(history.records().last().unwrap().task_id, "task-5");
        assert_eq!(store.load().unwrap().len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_delete_and_clear_overwrite_store() {
        let store = MemoryHistoryStore::default();
        let mut history = ProjectHistory::open(store.clone());
        let id = history.add(record(1)).unwrap().id;
        history.add(record(2)).unwrap();

        assert!(history.delete(id).unwrap());
        assert!(!history.delete(id).unwrap());
        assert_eq!(store.load().unwrap().len(), 1);

        history.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let mut history = ProjectHistory::open(MemoryHistoryStore::default());
        let entry = history.add(record(7)).unwrap().clone();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["taskId"], "task-7");
        assert_eq!(json["pitchShift"], -3.0);
        assert!(json.get("createdAt").is_some());
    }
}
