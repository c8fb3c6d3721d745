mod all;
mod analysis;
mod dashboard;
mod designer;
mod field;
mod footer;
mod form_list;
mod log;
mod modal;
mod preview;
mod publish;
mod sidebar;
mod templates;

use self::log::log;
use super::*;
use footer::footer;
use modal::modal;
use sidebar::sidebar;

pub use all::all as render;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Return a rectangle centered in `r` taking the given percentages of it.
///
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate a string to `max` characters, appending an ellipsis.
///
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
