//! Storage backends for the project history list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::state::ProjectRecord;

/// Ordered collection persisted under a single key; `save` replaces it wholesale.
pub trait HistoryStore {
    fn load(&self) -> io::Result<Vec<ProjectRecord>>;
    fn save(&self, records: &[ProjectRecord]) -> io::Result<()>;
}

/// JSON file store written through a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn load(&self) -> io::Result<Vec<ProjectRecord>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&json).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn save(&self, records: &[ProjectRecord]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json)?;
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
        fs::rename(&tmp_path, &self.path)
    }
}

/// In-process store. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    records: Arc<Mutex<Vec<ProjectRecord>>>,
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> io::Result<Vec<ProjectRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "history store poisoned"))?;
        Ok(records.clone())
    }

    fn save(&self, records: &[ProjectRecord]) -> io::Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "history store poisoned"))?;
        *stored = records.to_vec();
        Ok(())
    }
}
