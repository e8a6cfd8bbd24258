use tracing::{debug, info, warn};

use super::storage::{KeyValueStore, StorageError};
use crate::catalog::{JobRecord, JobStore};

/// Storage key holding the JSON array of saved job ids
pub const SAVED_JOBS_KEY: &str = "savedJobs";

/// Bookmarked job ids, mirrored to durable storage on every change
///
/// Ids keep the order they were saved in. The in-memory set only changes after
/// storage accepted the new value.
pub struct SavedJobs<S: KeyValueStore> {
    ids: Vec<String>,
    store: S,
}

impl<S: KeyValueStore> SavedJobs<S> {
    /// Read the saved set from storage
    ///
    /// An absent key, an unreadable store, or content that is not a JSON array of
    /// strings all yield an empty set.
    pub fn load(store: S) -> Self {
        let ids = match store.get(SAVED_JOBS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => dedup(ids),
                Err(e) => {
                    warn!("Stored saved jobs are malformed, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No saved jobs stored yet");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read saved jobs, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Loaded {} saved jobs", ids.len());
        Self { ids, store }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    /// Add `id` if absent, remove it if present
    ///
    /// Returns whether `id` is saved afterwards.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut updated = self.ids.clone();
        let now_saved = match updated.iter().position(|saved| saved == id) {
            Some(index) => {
                updated.remove(index);
                false
            }
            None => {
                updated.push(id.to_string());
                true
            }
        };

        let encoded = serde_json::to_string(&updated).map_err(StorageError::Encode)?;
        self.store.set(SAVED_JOBS_KEY, encoded)?;
        self.ids = updated;

        info!("Job {} {}", id, if now_saved { "saved" } else { "unsaved" });
        Ok(now_saved)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Catalog records that are saved, in catalog order
    ///
    /// Saved ids the catalog does not know are skipped.
    pub fn records<'a>(&self, catalog: &'a JobStore) -> Vec<&'a JobRecord> {
        catalog.all().iter().filter(|job| self.is_saved(&job.id)).collect()
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
