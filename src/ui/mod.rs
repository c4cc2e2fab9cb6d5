mod quiz;
mod review;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::view::Screen;

pub fn render(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match screen {
        Screen::Loading => status::render_loading(frame, area),
        Screen::Failed { message } => status::render_failed(frame, area, message),
        Screen::Quiz(view) => match &view.review {
            Some(review) => {
                let [quiz_area, review_area] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .areas(area);
                quiz::render(frame, quiz_area, view);
                review::render(frame, review_area, review);
            }
            None => quiz::render(frame, area, view),
        },
    }
}
