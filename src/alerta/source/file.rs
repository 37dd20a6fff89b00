use super::{next_id, RecordSource};
use crate::error::{AlertaError, Result};
use crate::model::OccurrenceDraft;
use crate::normalize::{RawLogEntry, RawOccurrence, RawProfile};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const OCCURRENCES_FILE: &str = "occurrences.json";
const LOGS_FILE: &str = "logs.json";
const PROFILE_FILE: &str = "profile.json";

pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a JSON file, or `T::default()` when it does not exist.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no data file, using empty snapshot");
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path).map_err(AlertaError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            AlertaError::Source(format!("{} is not valid JSON: {}", path.display(), e))
        })
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(AlertaError::Io)?;
        }
        Ok(())
    }
}

impl RecordSource for FileSource {
    fn fetch_occurrences(&self) -> Result<Vec<RawOccurrence>> {
        self.load(OCCURRENCES_FILE)
    }

    fn fetch_logs(&self) -> Result<Vec<RawLogEntry>> {
        self.load(LOGS_FILE)
    }

    fn fetch_profile(&self) -> Result<RawProfile> {
        self.load(PROFILE_FILE)
    }

    fn submit_occurrence(&mut self, draft: &OccurrenceDraft) -> Result<u64> {
        self.ensure_dir()?;
        let mut raws: Vec<RawOccurrence> = self.load(OCCURRENCES_FILE)?;
        let id = next_id(&raws);
        // Newest first, like the API serves them.
        raws.insert(0, RawOccurrence::from_draft(id, draft));

        let content = serde_json::to_string_pretty(&raws).map_err(AlertaError::Serialization)?;
        fs::write(self.root.join(OCCURRENCES_FILE), content).map_err(AlertaError::Io)?;
        tracing::info!(id, "stored new occurrence");
        Ok(id)
    }
}
