use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render_loading(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from("Loading questions…".fg(Color::DarkGray)),
        Line::from(""),
    ];
    render_box(frame, area, content, Color::DarkGray);
}

pub fn render_failed(frame: &mut Frame, area: Rect, message: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "COULD NOT LOAD QUESTIONS",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(message.fg(Color::Gray)),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];
    render_box(frame, area, content, Color::Red);
}

fn render_box(frame: &mut Frame, area: Rect, content: Vec<Line>, border: Color) {
    let height = content.len() as u16 + 2;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(border));

    frame.render_widget(widget, middle);
}
