//! # quiz-keeper
//!
//! A terminal multiple-choice quiz that remembers where you left off.
//!
//! Each question takes exactly one answer. Progress (current question,
//! score and answers) is written through to a key/value store after every
//! change, so a restarted session resumes where it stopped. Review mode
//! lists every answered question with its verdict and explanation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_keeper::{CatalogSource, FileStore, ProgressStore, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let progress = ProgressStore::new(FileStore::open("quiz-progress.json"));
//!     let quiz = Quiz::loading(CatalogSource::File("questions.json".into()), progress);
//!
//!     // Takes over the terminal until the user quits.
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
mod models;
pub mod review;
pub mod session;
pub mod storage;
pub mod terminal;
mod ui;
pub mod view;

use std::io;
use std::pin::pin;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info};

pub use app::{App, NO_SELECTION_NOTICE};
pub use config::{Config, ConfigError};
pub use data::{load_catalog, parse_catalog, CatalogSource, LoadError};
pub use models::{AnswerRecord, Catalog, CatalogError, Choice, Question, SessionState};
pub use session::{AnswerOutcome, QuizSession};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, ProgressStore, StorageError, StorageKeys,
    StoredProgress,
};

type CatalogReceiver = oneshot::Receiver<Result<Catalog, LoadError>>;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Progress storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz<S> {
    app: App<S>,
    source: Option<CatalogSource>,
}

impl<S: KeyValueStore> Quiz<S> {
    /// Create a quiz over an already loaded catalog.
    pub fn new(catalog: Catalog, progress: ProgressStore<S>) -> Self {
        Self {
            app: App::with_session(QuizSession::restore(catalog, progress)),
            source: None,
        }
    }

    /// Create a quiz whose catalog is loaded once [`Quiz::run`] starts. A
    /// loading placeholder is shown until then.
    pub fn loading(source: CatalogSource, progress: ProgressStore<S>) -> Self {
        Self {
            app: App::loading(progress),
            source: Some(source),
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let pending = self.source.take().map(spawn_catalog_load);
        let mut guard = terminal::TerminalGuard::enter()?;
        info!("quiz started");

        drive(&mut self.app, pending, EventStream::new(), |screen| {
            guard.terminal().draw(|frame| ui::render(frame, screen))?;
            Ok(())
        })
        .await?;

        info!("quiz finished");
        Ok(())
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App<S> {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App<S> {
        &mut self.app
    }
}

fn spawn_catalog_load(source: CatalogSource) -> CatalogReceiver {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = load_catalog(source).await;
        let _ = tx.send(result);
    });
    rx
}

enum Step {
    Catalog(Option<Result<Catalog, LoadError>>),
    Input(Option<io::Result<Event>>),
}

/// Resolves once the loader answers; never, when nothing is pending.
async fn next_catalog(
    pending: &mut Option<CatalogReceiver>,
) -> Option<Result<Catalog, LoadError>> {
    match pending {
        Some(rx) => rx.await.ok(),
        None => std::future::pending().await,
    }
}

/// Redraw, then wait for either the catalog or the next terminal event.
async fn drive<S, E, D>(
    app: &mut App<S>,
    mut pending: Option<CatalogReceiver>,
    events: E,
    mut draw: D,
) -> Result<(), QuizError>
where
    S: KeyValueStore,
    E: Stream<Item = io::Result<Event>>,
    D: FnMut(&view::Screen) -> io::Result<()>,
{
    let mut events = pin!(events);

    loop {
        draw(&app.screen())?;

        let step = tokio::select! {
            delivered = next_catalog(&mut pending) => Step::Catalog(delivered),
            event = events.next() => Step::Input(event),
        };

        match step {
            Step::Catalog(delivered) => {
                pending = None;
                match delivered {
                    Some(result) => app.catalog_loaded(result),
                    None => debug!("catalog loader went away without a result"),
                }
            }
            Step::Input(None) => break,
            Step::Input(Some(event)) => {
                if let Event::Key(key) = event? {
                    if key.kind == KeyEventKind::Press && handle_input(app, key.code) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
pub fn handle_input<S: KeyValueStore>(app: &mut App<S>, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        return true;
    }
    if app.session().is_none() {
        return false;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            if app.is_review_visible() {
                app.scroll_review_up();
            } else {
                app.select_previous_option();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.is_review_visible() {
                app.scroll_review_down();
            } else {
                app.select_next_option();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.submit(),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('N') => app.next(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
        KeyCode::Tab | KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_review(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyEvent, KeyModifiers};
    use futures_util::stream;

    use super::*;
    use crate::view::Screen;

    fn press(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// A key stream that presses `q` once `delay` has passed.
    fn quit_after(delay: Duration) -> impl Stream<Item = io::Result<Event>> {
        stream::once(async move {
            tokio::time::sleep(delay).await;
            press(KeyCode::Char('q'))
        })
    }

    async fn run_headless<S: KeyValueStore>(
        quiz: &mut Quiz<S>,
        events: impl Stream<Item = io::Result<Event>>,
    ) -> Vec<Screen> {
        let pending = quiz.source.take().map(spawn_catalog_load);
        let mut screens = Vec::new();
        drive(&mut quiz.app, pending, events, |screen| {
            screens.push(screen.clone());
            Ok(())
        })
        .await
        .unwrap();
        screens
    }

    fn quiz() -> Quiz<MemoryStore> {
        let catalog = parse_catalog(
            r#"[
                {"id": "q1", "prompt": "p1", "explanation": "e1", "correctChoiceId": "a",
                 "choices": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}]},
                {"id": "q2", "prompt": "p2", "explanation": "e2", "correctChoiceId": "b",
                 "choices": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}]}
            ]"#,
            "test",
        )
        .unwrap();
        Quiz::new(catalog, ProgressStore::new(MemoryStore::new()))
    }

    #[test]
    fn test_keys_drive_the_session() {
        let mut quiz = quiz();
        let app = quiz.app_mut();

        assert!(!handle_input(app, KeyCode::Char('j')));
        assert!(!handle_input(app, KeyCode::Enter));
        assert!(!handle_input(app, KeyCode::Char('n')));

        let session = app.session().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 1);

        assert!(!handle_input(app, KeyCode::Char('r')));
        assert_eq!(app.session().unwrap().current_index(), 0);
        assert!(handle_input(app, KeyCode::Char('q')));
    }

    #[test]
    fn test_arrow_keys_scroll_review_when_visible() {
        let mut quiz = quiz();
        let app = quiz.app_mut();
        handle_input(app, KeyCode::Char('v'));
        assert!(app.is_review_visible());

        handle_input(app, KeyCode::Char('j'));
        assert_eq!(app.cursor(), None);
    }

    #[test]
    fn test_only_quit_works_while_loading() {
        let mut app = App::loading(ProgressStore::new(MemoryStore::new()));
        assert!(!handle_input(&mut app, KeyCode::Enter));
        assert!(!handle_input(&mut app, KeyCode::Char('v')));
        assert!(!app.is_review_visible());
        assert!(handle_input(&mut app, KeyCode::Esc));
    }

    #[tokio::test]
    async fn test_catalog_arrives_on_current_thread_runtime() {
        let mut quiz = Quiz::loading(
            CatalogSource::BuiltIn,
            ProgressStore::new(MemoryStore::new()),
        );
        let screens = run_headless(&mut quiz, quit_after(Duration::from_millis(500))).await;

        assert_eq!(screens.first(), Some(&Screen::Loading));
        assert!(matches!(screens.last(), Some(Screen::Quiz(_))));
        let session = quiz.app().session().unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test]
    async fn test_missing_catalog_file_ends_in_failed_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut quiz = Quiz::loading(
            CatalogSource::File(dir.path().join("missing.json")),
            ProgressStore::new(MemoryStore::new()),
        );
        let screens = run_headless(&mut quiz, quit_after(Duration::from_millis(500))).await;

        match screens.last() {
            Some(Screen::Failed { message }) => assert!(message.contains("missing.json")),
            other => panic!("expected failure screen, got {:?}", other),
        }
        assert!(quiz.app().session().is_none());
    }

    #[tokio::test]
    async fn test_key_events_reach_the_session() {
        let mut quiz = quiz();
        let release = Ok(Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        )));
        let events = stream::iter(vec![
            release,
            press(KeyCode::Char('j')),
            press(KeyCode::Enter),
        ]);

        let screens = run_headless(&mut quiz, events).await;

        assert_eq!(screens.len(), 4);
        let session = quiz.app().session().unwrap();
        assert_eq!(session.score(), 1);
        assert_eq!(quiz.app().cursor(), Some(0));
    }
}
