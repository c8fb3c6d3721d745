use super::{
    analysis, dashboard, designer, footer, form_list, log, modal, preview, publish, sidebar,
    templates, Frame,
};
use crate::state::{State, StatusLevel, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

const BANNER: &str = "福利发放管理后台";

/// Render all widgets according to state.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    banner(frame, rows[0], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1)])
        .split(rows[1]);
    sidebar(frame, body[0], state);

    if state.is_debug_mode() {
        let main_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(body[1]);
        main(frame, main_rows[0], state);
        log(frame, main_rows[1], state);
    } else {
        main(frame, body[1], state);
    }

    footer(frame, rows[2], state);
    modal(frame, size, state);
}

fn banner(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Min(1)])
        .split(size);

    let title = Line::from(vec![
        Span::styled(format!(" {} ", BANNER), styling::banner_style(theme)),
        Span::styled(
            format!("· {}", state.current_view().title()),
            styling::secondary_text_style(theme),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), columns[0]);

    if let Some(status) = state.status() {
        let style = match status.level {
            StatusLevel::Info => styling::success_text_style(theme),
            StatusLevel::Error => styling::error_text_style(theme),
        };
        let line = Line::from(Span::styled(format!("{} ", status.text), style));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), columns[1]);
    }
}

fn main(frame: &mut Frame, size: Rect, state: &State) {
    match state.current_view() {
        View::Dashboard => dashboard::dashboard(frame, size, state),
        View::Forms => form_list::form_list(frame, size, state),
        View::Designer => {
            if state.is_preview_open() {
                preview::preview(frame, size, state);
            } else {
                designer::designer(frame, size, state);
            }
        }
        View::Templates => templates::templates(frame, size, state),
        View::Publish => publish::publish(frame, size, state),
        View::Analysis => analysis::analysis(frame, size, state),
    }
}
