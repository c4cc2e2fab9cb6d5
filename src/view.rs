//! Plain data handed to the renderer. Nothing here touches the terminal.

use crate::review::{ReviewCard, ReviewSummary};
use crate::session::{Feedback, ProgressLabel};

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Failed { message: String },
    Quiz(QuizView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub label: String,
    /// Under the cursor, or the recorded answer once submitted.
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub cards: Vec<ReviewCard>,
    pub summary: ReviewSummary,
    pub scroll: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub prompt: String,
    pub choices: Vec<ChoiceView>,
    pub progress: ProgressLabel,
    pub feedback: Option<Feedback>,
    pub notice: Option<String>,
    pub submit_enabled: bool,
    pub next_enabled: bool,
    pub complete: bool,
    /// Present while review mode is toggled on.
    pub review: Option<ReviewView>,
}
