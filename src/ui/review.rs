use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::review::ReviewCard;
use crate::view::ReviewView;

pub fn render(frame: &mut Frame, area: Rect, review: &ReviewView) {
    let [summary, cards] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let title = Line::from(Span::styled(
        "REVIEW",
        Style::default().fg(Color::Cyan).bold(),
    ));
    let counts = format!(
        "{} / {} correct  ({:.0}%)",
        review.summary.correct,
        review.summary.answered,
        review.summary.percentage()
    );
    let header = Paragraph::new(vec![title, Line::from(counts.fg(Color::Gray))])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(header, summary);

    let lines: Vec<Line> = if review.cards.is_empty() {
        vec![Line::from("Nothing answered yet.".fg(Color::DarkGray))]
    } else {
        review
            .cards
            .iter()
            .skip(review.scroll)
            .flat_map(card_lines)
            .collect()
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, cards);
}

fn card_lines(card: &ReviewCard) -> Vec<Line<'_>> {
    let (status, color) = if card.is_correct {
        ("Correct", Color::Green)
    } else {
        ("Incorrect", Color::Red)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Q{}: {}", card.question_index + 1, card.prompt),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(Span::styled(status, Style::default().fg(color))),
        Line::from(format!("Your answer: {}", card.selected_label).fg(Color::Gray)),
    ];

    for choice in &card.choices {
        let suffix = match (choice.is_correct, choice.is_selected) {
            (true, _) => " (correct answer)",
            (false, true) => " (your choice)",
            (false, false) => "",
        };
        let color = if choice.is_correct {
            Color::Green
        } else if choice.is_selected {
            Color::Red
        } else {
            Color::DarkGray
        };
        lines.push(Line::from(Span::styled(
            format!("  - {}{}", choice.label, suffix),
            Style::default().fg(color),
        )));
    }

    lines.push(Line::from(card.explanation.as_str().fg(Color::Gray)));
    lines.push(Line::from(""));
    lines
}
