use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::view::{ChoiceView, QuizView};

const CHOICE_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn render(frame: &mut Frame, area: Rect, view: &QuizView) {
    let [progress, prompt, choices, feedback, controls] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);

    render_progress(frame, progress, view);
    render_prompt(frame, prompt, &view.prompt);
    render_choices(frame, choices, &view.choices, view.submit_enabled);
    render_feedback(frame, feedback, view);
    render_controls(frame, controls, view);
}

fn render_progress(frame: &mut Frame, area: Rect, view: &QuizView) {
    let mut text = format!(
        "Question {} of {}  ·  Score: {}",
        view.progress.position, view.progress.total, view.progress.score
    );
    if view.complete {
        text.push_str("  ·  all answered");
    }
    let widget = Paragraph::new(text)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    let widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_choices(frame: &mut Frame, area: Rect, choices: &[ChoiceView], open: bool) {
    let mut lines: Vec<Line> = Vec::with_capacity(choices.len() * 2);

    for (index, choice) in choices.iter().enumerate() {
        let style = match (choice.is_selected, open) {
            (true, true) => Style::default().fg(Color::Cyan).bold(),
            (true, false) => Style::default().fg(Color::White).bold(),
            (false, true) => Style::default().fg(Color::Gray),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        let marker = if choice.is_selected { ">" } else { " " };
        let letter = CHOICE_LETTERS
            .get(index)
            .map(|b| *b as char)
            .unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", letter), style),
            Span::styled(choice.label.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, view: &QuizView) {
    let lines = match (&view.feedback, &view.notice) {
        (Some(feedback), _) => {
            let (verdict, color) = if feedback.is_correct {
                ("Correct!", Color::Green)
            } else {
                ("Incorrect.", Color::Red)
            };
            vec![
                Line::from(Span::styled(verdict, Style::default().fg(color).bold())),
                Line::from(feedback.explanation.as_str().fg(Color::Gray)),
            ]
        }
        (None, Some(notice)) => vec![Line::from(notice.as_str().fg(Color::Red))],
        (None, None) => Vec::new(),
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_controls(frame: &mut Frame, area: Rect, view: &QuizView) {
    let mut hints = Vec::new();
    if view.submit_enabled {
        hints.push("j/k choose");
        hints.push("enter submit");
    }
    if view.next_enabled {
        hints.push("n next");
    }
    hints.push(if view.review.is_some() {
        "v hide review"
    } else {
        "v review"
    });
    hints.push("r reset");
    hints.push("q quit");

    let widget = Paragraph::new(hints.join("  ·  "))
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
