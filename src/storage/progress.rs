use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AnswerRecord, SessionState};

use super::{KeyValueStore, StorageError};

/// Names of the three keys progress is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub index: String,
    pub score: String,
    pub answered: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            index: "quiz_current_index".to_string(),
            score: "quiz_score".to_string(),
            answered: "quiz_answered".to_string(),
        }
    }
}

/// Whatever subset of the session fields was present and well formed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredProgress {
    pub current_index: Option<usize>,
    pub score: Option<u32>,
    pub answered: Option<AnswerRecord>,
}

impl StoredProgress {
    /// Fill absent fields with their defaults.
    pub fn into_state(self) -> SessionState {
        SessionState {
            current_index: self.current_index.unwrap_or(0),
            score: self.score.unwrap_or(0),
            answered: self.answered.unwrap_or_default(),
        }
    }
}

/// Reads and writes [`SessionState`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct ProgressStore<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load each field independently; malformed values count as absent.
    pub fn load(&self) -> StoredProgress {
        let current_index = self
            .read(&self.keys.index)
            .and_then(|raw| parse_count(&self.keys.index, &raw))
            .and_then(|value| usize::try_from(value).ok());
        let score = self
            .read(&self.keys.score)
            .and_then(|raw| parse_count(&self.keys.score, &raw))
            .and_then(|value| u32::try_from(value).ok());
        let answered = self
            .read(&self.keys.answered)
            .and_then(|raw| parse_answered(&self.keys.answered, &raw));

        StoredProgress {
            current_index,
            score,
            answered,
        }
    }

    pub fn save(&mut self, state: &SessionState) -> Result<(), StorageError> {
        let answered = serde_json::to_string(&state.answered)?;
        self.store.set_all(vec![
            (self.keys.index.as_str(), state.current_index.to_string()),
            (self.keys.score.as_str(), state.score.to_string()),
            (self.keys.answered.as_str(), answered),
        ])
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove_all(&[
            self.keys.index.as_str(),
            self.keys.score.as_str(),
            self.keys.answered.as_str(),
        ])
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}

/// Numeric coercion for stored counters: surrounding whitespace is ignored
/// and a blank value reads as zero.
fn parse_count(key: &str, raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    match trimmed.parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(key, value = raw, error = %err, "ignoring malformed stored counter");
            None
        }
    }
}

fn parse_answered(key: &str, raw: &str) -> Option<AnswerRecord> {
    match serde_json::from_str(raw) {
        Ok(record) => Some(record),
        Err(err) => {
            debug!(key, error = %err, "ignoring malformed stored answers");
            None
        }
    }
}
