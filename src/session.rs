//! Quiz progression state machine.
//!
//! A [`QuizSession`] owns the catalog, the in-memory [`SessionState`] and the
//! [`ProgressStore`] it writes through to after every mutation.

use tracing::{debug, info, warn};

use crate::models::{AnswerRecord, Catalog, Question, SessionState};
use crate::review::{self, ReviewCard};
use crate::storage::{KeyValueStore, ProgressStore};

/// Result of [`QuizSession::answer_current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded { correct: bool },
    AlreadyAnswered,
}

/// `(position, total, score)` for the status line. `position` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressLabel {
    pub position: usize,
    pub total: usize,
    pub score: u32,
}

/// Correctness and explanation shown once the current question is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub explanation: String,
}

pub struct QuizSession<S> {
    catalog: Catalog,
    state: SessionState,
    progress: ProgressStore<S>,
}

impl<S: KeyValueStore> QuizSession<S> {
    /// Start from whatever the progress store holds.
    ///
    /// The stored score is not trusted: it is recomputed from the answer
    /// record. An out-of-range index restarts at the first question.
    pub fn restore(catalog: Catalog, progress: ProgressStore<S>) -> Self {
        let stored = progress.load();
        let stored_score = stored.score;
        let mut state = stored.into_state();

        if state.current_index >= catalog.len() {
            debug!(
                index = state.current_index,
                total = catalog.len(),
                "stored index out of range, starting over"
            );
            state.current_index = 0;
        }

        state.score = score_answers(&catalog, &state.answered);
        if stored_score.is_some_and(|score| score != state.score) {
            warn!(
                stored = stored_score,
                recomputed = state.score,
                "stored score disagrees with answers, using recomputed score"
            );
        }

        info!(
            index = state.current_index,
            answered = state.answered.len(),
            score = state.score,
            "restored quiz session"
        );

        Self {
            catalog,
            state,
            progress,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn progress_store(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn answered(&self) -> &AnswerRecord {
        &self.state.answered
    }

    pub fn current_question(&self) -> &Question {
        // current_index is kept in range by restore/advance/reset and the
        // catalog is never empty.
        &self.catalog.questions()[self.state.current_index]
    }

    pub fn is_current_answered(&self) -> bool {
        self.state.answered.contains(&self.current_question().id)
    }

    /// The recorded choice for the current question, for resumed sessions.
    pub fn selection_for_current(&self) -> Option<&str> {
        self.state.answered.get(&self.current_question().id)
    }

    pub fn feedback_for_current(&self) -> Option<Feedback> {
        let question = self.current_question();
        let choice_id = self.state.answered.get(&question.id)?;
        Some(Feedback {
            is_correct: question.is_correct(choice_id),
            explanation: question.explanation.clone(),
        })
    }

    pub fn is_last_question(&self) -> bool {
        self.state.current_index + 1 >= self.catalog.len()
    }

    pub fn can_advance(&self) -> bool {
        self.is_current_answered() && !self.is_last_question()
    }

    /// True once every catalog question has an answer.
    pub fn is_complete(&self) -> bool {
        self.catalog
            .questions()
            .iter()
            .all(|q| self.state.answered.contains(&q.id))
    }

    pub fn progress_label(&self) -> ProgressLabel {
        ProgressLabel {
            position: self.state.current_index + 1,
            total: self.catalog.len(),
            score: self.state.score,
        }
    }

    /// Number of review cards: catalog questions that have an answer.
    pub fn reviewable_count(&self) -> usize {
        self.catalog
            .questions()
            .iter()
            .filter(|q| self.state.answered.contains(&q.id))
            .count()
    }

    pub fn review(&self) -> Vec<ReviewCard> {
        review::compile(&self.catalog, &self.state.answered)
    }

    /// Record `choice_id` for the current question.
    ///
    /// A second submission for the same question is ignored. The choice id
    /// is taken as given; the caller only passes ids it offered.
    pub fn answer_current(&mut self, choice_id: &str) -> AnswerOutcome {
        let question = &self.catalog.questions()[self.state.current_index];
        if !self.state.answered.record(&question.id, choice_id) {
            debug!(question = %question.id, "ignoring repeated answer");
            return AnswerOutcome::AlreadyAnswered;
        }

        let correct = question.is_correct(choice_id);
        if correct {
            self.state.score += 1;
        }
        debug!(
            question = %question.id,
            choice = choice_id,
            correct,
            score = self.state.score,
            "answer recorded"
        );

        self.persist();
        AnswerOutcome::Recorded { correct }
    }

    /// Move to the next question. Returns false when not allowed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }

        self.state.current_index += 1;
        debug!(index = self.state.current_index, "advanced");
        self.persist();
        true
    }

    pub fn reset(&mut self) {
        if self.catalog.is_empty() {
            return;
        }

        self.state = SessionState::default();
        if let Err(err) = self.progress.clear() {
            warn!(error = %err, "failed to clear stored progress");
        }
        info!("quiz progress reset");
    }

    fn persist(&mut self) {
        if let Err(err) = self.progress.save(&self.state) {
            warn!(error = %err, "failed to persist quiz progress");
        }
    }
}

/// Count answers that match their question's correct choice. Answers for
/// questions missing from the catalog never count.
pub fn score_answers(catalog: &Catalog, answered: &AnswerRecord) -> u32 {
    let correct = answered
        .iter()
        .filter(|(question_id, choice_id)| {
            catalog
                .find(question_id)
                .is_some_and(|question| question.is_correct(choice_id))
        })
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::models::sample_question;
    use crate::storage::{MemoryStore, StoredProgress};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            sample_question("q1", "a"),
            sample_question("q2", "b"),
            sample_question("q3", "c"),
        ])
        .unwrap()
    }

    fn fresh() -> QuizSession<MemoryStore> {
        QuizSession::restore(catalog(), ProgressStore::new(MemoryStore::new()))
    }

    fn reload(session: QuizSession<MemoryStore>) -> QuizSession<MemoryStore> {
        let store = session.progress_store().inner().clone();
        QuizSession::restore(catalog(), ProgressStore::new(store))
    }

    #[test]
    fn test_fresh_session_defaults() {
        let session = fresh();
        assert_eq!(session.state(), &SessionState::default());
        assert!(!session.is_current_answered());
        assert!(!session.can_advance());
        assert_eq!(session.feedback_for_current(), None);
        assert_eq!(
            session.progress_label(),
            ProgressLabel {
                position: 1,
                total: 3,
                score: 0
            }
        );
    }

    #[test]
    fn test_answer_correct_and_incorrect() {
        let mut session = fresh();
        assert_eq!(
            session.answer_current("a"),
            AnswerOutcome::Recorded { correct: true }
        );
        assert_eq!(session.score(), 1);
        assert!(session.advance());

        assert_eq!(
            session.answer_current("c"),
            AnswerOutcome::Recorded { correct: false }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered().len(), 2);

        let feedback = session.feedback_for_current().unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.explanation, "Explanation for q2");
    }

    #[test]
    fn test_repeated_answer_is_ignored() {
        let mut session = fresh();
        session.answer_current("b");
        let after_first = session.state().clone();

        assert_eq!(session.answer_current("a"), AnswerOutcome::AlreadyAnswered);
        assert_eq!(session.answer_current("b"), AnswerOutcome::AlreadyAnswered);
        assert_eq!(session.state(), &after_first);
        assert_eq!(session.selection_for_current(), Some("b"));
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut session = fresh();
        assert!(!session.advance());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_advance_stops_at_last_question() {
        let mut session = fresh();
        for choice in ["a", "b"] {
            session.answer_current(choice);
            assert!(session.advance());
        }
        assert!(session.is_last_question());
        assert!(!session.advance());

        session.answer_current("c");
        assert!(!session.advance());
        assert_eq!(session.current_index(), 2);
        assert!(session.is_complete());
    }

    #[test]
    fn test_writes_through_on_every_mutation() {
        let mut session = fresh();
        session.answer_current("a");
        let stored = session.progress_store().load();
        assert_eq!(stored.score, Some(1));
        assert_eq!(stored.current_index, Some(0));

        session.advance();
        assert_eq!(session.progress_store().load().current_index, Some(1));
    }

    #[test]
    fn test_reset_restores_initial_state_and_clears_store() {
        let mut session = fresh();
        session.answer_current("a");
        session.advance();
        session.answer_current("a");

        session.reset();
        assert_eq!(session.state(), &SessionState::default());
        assert_eq!(session.progress_store().load(), StoredProgress::default());
        assert_eq!(
            session.progress_store().load().into_state(),
            SessionState::default()
        );
    }

    #[test]
    fn test_reload_resumes_session() {
        let mut session = fresh();
        session.answer_current("a");
        session.advance();
        session.answer_current("a");
        session.advance();

        let session = reload(session);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered().len(), 2);
        assert!(!session.is_current_answered());
    }

    #[test]
    fn test_restore_recomputes_tampered_score() {
        let mut store = MemoryStore::new();
        store.set("quiz_score", "7".to_string()).unwrap();
        store
            .set("quiz_answered", r#"{"q1":"a","q2":"a","zz":"a"}"#.to_string())
            .unwrap();

        let session = QuizSession::restore(catalog(), ProgressStore::new(store));
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered().len(), 3);
        assert_eq!(session.reviewable_count(), 2);
        assert_eq!(session.review().len(), session.reviewable_count());
    }

    #[test]
    fn test_restore_out_of_range_index_starts_over() {
        let mut store = MemoryStore::new();
        store.set("quiz_current_index", "3".to_string()).unwrap();

        let session = QuizSession::restore(catalog(), ProgressStore::new(store));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_score_matches_answers_for_random_runs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let choices = ["a", "b", "c"];

        for _ in 0..200 {
            let mut session = fresh();
            let steps = rng.random_range(1..12);
            for _ in 0..steps {
                match rng.random_range(0..3) {
                    0 | 1 => {
                        let choice = choices[rng.random_range(0..choices.len())];
                        session.answer_current(choice);
                    }
                    _ => {
                        session.advance();
                    }
                }
                assert_eq!(
                    session.score(),
                    score_answers(session.catalog(), session.answered())
                );
                assert!(session.current_index() < session.catalog().len());
            }
        }
    }
}
