use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Question id to the single choice id selected for it.
///
/// Entries are write-once: [`AnswerRecord::record`] refuses to replace an
/// existing answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<String, String>);

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the question already had an answer.
    pub fn record(&mut self, question_id: &str, choice_id: &str) -> bool {
        if self.0.contains_key(question_id) {
            return false;
        }
        self.0.insert(question_id.to_string(), choice_id.to_string());
        true
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(q, c)| (q.as_str(), c.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The persisted part of a quiz session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub score: u32,
    pub answered: AnswerRecord,
}
