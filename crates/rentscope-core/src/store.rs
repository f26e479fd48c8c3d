//! Injected key-value persistence.
//!
//! Hosts supply a backing store (a file per key on the CLI, browser storage
//! behind the bindings, memory in tests); nothing in this crate touches
//! ambient storage directly. [`AnalysisStore`] layers the two persisted
//! concerns on top: the saved-analysis history and the estimation API key.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RentscopeError;
use crate::share::SharedAnalysis;
use crate::RentscopeResult;

/// Maximum number of saved analyses retained in history.
pub const HISTORY_LIMIT: usize = 50;

const HISTORY_KEY: &str = "history";
const API_KEY_KEY: &str = "api_key";
const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RentscopeResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RentscopeResult<()>;
    fn remove(&self, key: &str) -> RentscopeResult<()>;
}

/// One saved analysis with its save timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub analysis: SharedAnalysis,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct HistoryRecord {
    schema_version: u32,
    entries: Vec<HistoryEntry>,
}

/// Persisted analyst state over any [`KeyValueStore`].
pub struct AnalysisStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AnalysisStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved analyses, newest first. A missing, unreadable, or corrupt
    /// record reads as empty rather than failing: saved state is a
    /// convenience, never a reason to crash.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            _ => return Vec::new(),
        };

        serde_json::from_str::<HistoryRecord>(&raw)
            .map(|record| record.entries)
            .unwrap_or_default()
    }

    /// Prepend a saved analysis, trimming history to [`HISTORY_LIMIT`].
    pub fn save(&self, analysis: SharedAnalysis) -> RentscopeResult<HistoryEntry> {
        let entry = HistoryEntry {
            saved_at: Utc::now(),
            analysis,
        };

        let mut entries = self.entries();
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_LIMIT);

        let record = HistoryRecord {
            schema_version: HISTORY_SCHEMA_VERSION,
            entries,
        };
        self.store.set(HISTORY_KEY, &serde_json::to_string(&record)?)?;

        Ok(entry)
    }

    pub fn clear(&self) -> RentscopeResult<()> {
        self.store.remove(HISTORY_KEY)
    }

    /// Stored estimation API key, if any non-empty key was saved.
    pub fn api_key(&self) -> Option<String> {
        self.store
            .get(API_KEY_KEY)
            .ok()
            .flatten()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn set_api_key(&self, key: &str) -> RentscopeResult<()> {
        self.store.set(API_KEY_KEY, key.trim())
    }
}

/// In-memory store for tests and embedders without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> RentscopeResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| RentscopeError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RentscopeResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RentscopeError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RentscopeResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RentscopeError::Storage("memory store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}
