//! Review mode: a read-only summary of every answered question.

use crate::models::{AnswerRecord, Catalog};

const NOT_ANSWERED_LABEL: &str = "Not answered";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewChoice {
    pub label: String,
    pub is_selected: bool,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    /// 0-based position in the catalog.
    pub question_index: usize,
    pub prompt: String,
    pub is_correct: bool,
    pub selected_label: String,
    pub choices: Vec<ReviewChoice>,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub answered: usize,
    pub correct: usize,
}

impl ReviewSummary {
    pub fn from_cards(cards: &[ReviewCard]) -> Self {
        Self {
            answered: cards.len(),
            correct: cards.iter().filter(|card| card.is_correct).count(),
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.answered > 0 {
            (self.correct as f64 / self.answered as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// One card per answered question, in catalog order. Unanswered questions
/// are skipped.
pub fn compile(catalog: &Catalog, answered: &AnswerRecord) -> Vec<ReviewCard> {
    catalog
        .questions()
        .iter()
        .enumerate()
        .filter_map(|(index, question)| {
            let choice_id = answered.get(&question.id)?;
            let selected_label = question
                .choice(choice_id)
                .map(|choice| choice.label.clone())
                .unwrap_or_else(|| NOT_ANSWERED_LABEL.to_string());

            let choices = question
                .choices
                .iter()
                .map(|choice| ReviewChoice {
                    label: choice.label.clone(),
                    is_selected: choice.id == choice_id,
                    is_correct: question.is_correct(&choice.id),
                })
                .collect();

            Some(ReviewCard {
                question_index: index,
                prompt: question.prompt.clone(),
                is_correct: question.is_correct(choice_id),
                selected_label,
                choices,
                explanation: question.explanation.clone(),
            })
        })
        .collect()
}
