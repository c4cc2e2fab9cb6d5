use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub choices: Vec<Choice>,
    #[serde(alias = "correct_choice_id")]
    pub correct_choice_id: String,
    pub explanation: String,
}

impl Question {
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    pub fn choice_position(&self, choice_id: &str) -> Option<usize> {
        self.choices.iter().position(|choice| choice.id == choice_id)
    }

    pub fn is_correct(&self, choice_id: &str) -> bool {
        self.correct_choice_id == choice_id
    }
}

/// Reasons a question list cannot become a [`Catalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one question")]
    Empty,

    #[error("duplicate question id `{0}`")]
    DuplicateQuestion(String),

    #[error("question `{0}` has no choices")]
    NoChoices(String),

    #[error("question `{question}` repeats choice id `{choice}`")]
    DuplicateChoice { question: String, choice: String },

    #[error("question `{question}` marks unknown choice `{choice}` as correct")]
    UnknownCorrectChoice { question: String, choice: String },
}

/// Ordered, validated, immutable list of questions for one session.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut question_ids = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            validate_choices(question)?;
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

fn validate_choices(question: &Question) -> Result<(), CatalogError> {
    if question.choices.is_empty() {
        return Err(CatalogError::NoChoices(question.id.clone()));
    }

    let mut choice_ids = HashSet::with_capacity(question.choices.len());
    for choice in &question.choices {
        if !choice_ids.insert(choice.id.as_str()) {
            return Err(CatalogError::DuplicateChoice {
                question: question.id.clone(),
                choice: choice.id.clone(),
            });
        }
    }

    if !choice_ids.contains(question.correct_choice_id.as_str()) {
        return Err(CatalogError::UnknownCorrectChoice {
            question: question.id.clone(),
            choice: question.correct_choice_id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_question(id: &str, correct: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("Prompt for {}", id),
        choices: ["a", "b", "c"]
            .iter()
            .map(|c| Choice {
                id: c.to_string(),
                label: format!("Option {}", c.to_uppercase()),
            })
            .collect(),
        correct_choice_id: correct.to_string(),
        explanation: format!("Explanation for {}", id),
    }
}
