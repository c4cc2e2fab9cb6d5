use std::mem;

use tracing::{debug, warn};

use crate::data::LoadError;
use crate::models::Catalog;
use crate::review::ReviewSummary;
use crate::session::{AnswerOutcome, QuizSession};
use crate::storage::{KeyValueStore, ProgressStore};
use crate::view::{ChoiceView, QuizView, ReviewView, Screen};

pub const NO_SELECTION_NOTICE: &str = "Select an answer to continue.";

enum Phase<S> {
    Loading(ProgressStore<S>),
    Ready(QuizSession<S>),
    Failed(String),
}

/// Presentation controller: owns one quiz session plus UI-only state and
/// turns user intents into session operations.
pub struct App<S> {
    phase: Phase<S>,
    cursor: Option<usize>,
    review_visible: bool,
    review_scroll: usize,
    notice: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    /// Waiting for the catalog; progress is restored once it arrives.
    pub fn loading(progress: ProgressStore<S>) -> Self {
        Self::with_phase(Phase::Loading(progress))
    }

    pub fn with_session(session: QuizSession<S>) -> Self {
        let mut app = Self::with_phase(Phase::Ready(session));
        app.sync_cursor();
        app
    }

    fn with_phase(phase: Phase<S>) -> Self {
        Self {
            phase,
            cursor: None,
            review_visible: false,
            review_scroll: 0,
            notice: None,
        }
    }

    pub fn catalog_loaded(&mut self, result: Result<Catalog, LoadError>) {
        let phase = mem::replace(&mut self.phase, Phase::Failed(String::new()));
        self.phase = match (phase, result) {
            (Phase::Loading(progress), Ok(catalog)) => {
                Phase::Ready(QuizSession::restore(catalog, progress))
            }
            (Phase::Loading(_), Err(err)) => {
                warn!(error = %err, "question catalog failed to load");
                Phase::Failed(err.to_string())
            }
            (phase, _) => {
                debug!("catalog already settled, ignoring");
                phase
            }
        };
        self.sync_cursor();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading(_))
    }

    pub fn session(&self) -> Option<&QuizSession<S>> {
        match &self.phase {
            Phase::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_review_visible(&self) -> bool {
        self.review_visible
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn select_next_option(&mut self) {
        let Some(count) = self.selectable_choices() else {
            return;
        };
        self.cursor = Some(match self.cursor {
            Some(index) => (index + 1) % count,
            None => 0,
        });
    }

    pub fn select_previous_option(&mut self) {
        let Some(count) = self.selectable_choices() else {
            return;
        };
        self.cursor = Some(match self.cursor {
            Some(index) => (index + count - 1) % count,
            None => count - 1,
        });
    }

    /// Answer the current question with the choice under the cursor.
    pub fn submit(&mut self) {
        let Phase::Ready(session) = &mut self.phase else {
            return;
        };
        if session.is_current_answered() {
            return;
        }

        let choice_id = self
            .cursor
            .and_then(|index| session.current_question().choices.get(index))
            .map(|choice| choice.id.clone());
        let Some(choice_id) = choice_id else {
            self.notice = Some(NO_SELECTION_NOTICE.to_string());
            return;
        };

        if let AnswerOutcome::Recorded { .. } = session.answer_current(&choice_id) {
            self.notice = None;
        }
    }

    pub fn next(&mut self) {
        let Phase::Ready(session) = &mut self.phase else {
            return;
        };
        if session.advance() {
            self.notice = None;
            self.sync_cursor();
        }
    }

    pub fn reset(&mut self) {
        let Phase::Ready(session) = &mut self.phase else {
            return;
        };
        session.reset();
        self.notice = None;
        self.review_scroll = 0;
        self.sync_cursor();
    }

    pub fn toggle_review(&mut self) {
        self.review_visible = !self.review_visible;
        self.review_scroll = 0;
    }

    pub fn scroll_review_down(&mut self) {
        let cards = self.session().map_or(0, |s| s.reviewable_count());
        let max_scroll = cards.saturating_sub(1);
        self.review_scroll = (self.review_scroll + 1).min(max_scroll);
    }

    pub fn scroll_review_up(&mut self) {
        self.review_scroll = self.review_scroll.saturating_sub(1);
    }

    /// Build the view model for the current frame.
    pub fn screen(&self) -> Screen {
        let session = match &self.phase {
            Phase::Loading(_) => return Screen::Loading,
            Phase::Failed(message) => {
                return Screen::Failed {
                    message: message.clone(),
                };
            }
            Phase::Ready(session) => session,
        };

        let question = session.current_question();
        let choices = question
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceView {
                label: choice.label.clone(),
                is_selected: self.cursor == Some(index),
            })
            .collect();

        let review = self.review_visible.then(|| {
            let cards = session.review();
            let summary = ReviewSummary::from_cards(&cards);
            ReviewView {
                cards,
                summary,
                scroll: self.review_scroll,
            }
        });

        Screen::Quiz(QuizView {
            prompt: question.prompt.clone(),
            choices,
            progress: session.progress_label(),
            feedback: session.feedback_for_current(),
            notice: self.notice.clone(),
            submit_enabled: !session.is_current_answered(),
            next_enabled: session.can_advance(),
            complete: session.is_complete(),
            review,
        })
    }

    /// Choice count while the current question still takes input.
    fn selectable_choices(&self) -> Option<usize> {
        let session = self.session()?;
        if session.is_current_answered() {
            return None;
        }
        let count = session.current_question().choices.len();
        (count > 0).then_some(count)
    }

    /// Point the cursor at the recorded answer, or nowhere if unanswered.
    fn sync_cursor(&mut self) {
        self.cursor = self.session().and_then(|session| {
            let selected = session.selection_for_current()?;
            session.current_question().choice_position(selected)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_question;
    use crate::storage::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            sample_question("q1", "a"),
            sample_question("q2", "b"),
            sample_question("q3", "c"),
        ])
        .unwrap()
    }

    fn ready_app() -> App<MemoryStore> {
        let mut app = App::loading(ProgressStore::new(MemoryStore::new()));
        app.catalog_loaded(Ok(catalog()));
        app
    }

    fn quiz_view(app: &App<MemoryStore>) -> QuizView {
        match app.screen() {
            Screen::Quiz(view) => view,
            other => panic!("expected quiz screen, got {:?}", other),
        }
    }

    #[test]
    fn test_loading_until_catalog_arrives() {
        let app = App::loading(ProgressStore::new(MemoryStore::new()));
        assert!(app.is_loading());
        assert_eq!(app.screen(), Screen::Loading);
    }

    #[test]
    fn test_failed_catalog_shows_error() {
        let mut app = App::loading(ProgressStore::new(MemoryStore::new()));
        let err = crate::data::parse_catalog("[]", "test").unwrap_err();
        app.catalog_loaded(Err(err));

        match app.screen() {
            Screen::Failed { message } => assert!(message.contains("at least one question")),
            other => panic!("expected failure screen, got {:?}", other),
        }

        app.submit();
        app.next();
        assert!(app.session().is_none());
    }

    #[test]
    fn test_fresh_session_renders_unanswered() {
        let app = ready_app();
        let view = quiz_view(&app);
        assert_eq!(view.prompt, "Prompt for q1");
        assert!(view.submit_enabled);
        assert!(!view.next_enabled);
        assert!(view.feedback.is_none());
        assert!(view.choices.iter().all(|c| !c.is_selected));
        assert_eq!(view.progress.position, 1);
        assert_eq!(view.progress.total, 3);
    }

    #[test]
    fn test_submit_without_selection_shows_notice() {
        let mut app = ready_app();
        app.submit();

        assert_eq!(app.notice(), Some(NO_SELECTION_NOTICE));
        let session = app.session().unwrap();
        assert!(session.answered().is_empty());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_submit_then_next() {
        let mut app = ready_app();
        app.submit();
        app.select_next_option();
        app.submit();

        assert_eq!(app.notice(), None);
        let view = quiz_view(&app);
        assert!(!view.submit_enabled);
        assert!(view.next_enabled);
        assert!(view.feedback.as_ref().unwrap().is_correct);
        assert_eq!(view.progress.score, 1);

        app.next();
        assert_eq!(app.cursor(), None);
        assert_eq!(app.session().unwrap().current_index(), 1);
    }

    #[test]
    fn test_cursor_wraps_and_freezes_after_answer() {
        let mut app = ready_app();
        app.select_previous_option();
        assert_eq!(app.cursor(), Some(2));
        app.select_next_option();
        assert_eq!(app.cursor(), Some(0));

        app.submit();
        app.select_next_option();
        assert_eq!(app.cursor(), Some(0));
    }

    #[test]
    fn test_resumed_answer_is_preselected() {
        let mut store = MemoryStore::new();
        store
            .set("quiz_answered", r#"{"q1":"c"}"#.to_string())
            .unwrap();
        let mut app = App::loading(ProgressStore::new(store));
        app.catalog_loaded(Ok(catalog()));

        assert_eq!(app.cursor(), Some(2));
        let view = quiz_view(&app);
        assert!(view.choices[2].is_selected);
        assert!(!view.feedback.unwrap().is_correct);
    }

    #[test]
    fn test_review_toggle_and_reset() {
        let mut app = ready_app();
        app.select_next_option();
        app.submit();
        app.toggle_review();

        let review = quiz_view(&app).review.unwrap();
        assert_eq!(review.cards.len(), 1);
        assert_eq!(review.summary.correct, 1);

        app.reset();
        let view = quiz_view(&app);
        assert!(view.review.unwrap().cards.is_empty());
        assert_eq!(view.progress.score, 0);
        assert!(view.submit_enabled);

        app.toggle_review();
        assert!(quiz_view(&app).review.is_none());
    }

    #[test]
    fn test_review_scroll_is_bounded() {
        let mut app = ready_app();
        app.select_next_option();
        app.submit();
        app.next();
        app.select_next_option();
        app.submit();
        app.toggle_review();

        app.scroll_review_down();
        app.scroll_review_down();
        app.scroll_review_down();
        assert_eq!(quiz_view(&app).review.unwrap().scroll, 1);

        app.scroll_review_up();
        app.scroll_review_up();
        assert_eq!(quiz_view(&app).review.unwrap().scroll, 0);
    }

    #[test]
    fn test_review_scroll_ignores_answers_outside_catalog() {
        let mut store = MemoryStore::new();
        store
            .set(
                "quiz_answered",
                r#"{"q1":"a","retired-1":"a","retired-2":"b"}"#.to_string(),
            )
            .unwrap();
        let mut app = App::loading(ProgressStore::new(store));
        app.catalog_loaded(Ok(catalog()));
        app.toggle_review();

        app.scroll_review_down();
        app.scroll_review_down();

        let review = quiz_view(&app).review.unwrap();
        assert_eq!(review.cards.len(), 1);
        assert_eq!(review.scroll, 0);
    }
}
