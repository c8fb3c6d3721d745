use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the pending confirmation or text input over everything else.
///
pub fn modal(frame: &mut Frame, size: Rect, state: &State) {
    if state.confirmation().is_some() {
        confirmation(frame, size, state);
    } else if state.text_input().is_some() {
        text_input(frame, size, state);
    }
}

fn confirmation(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let confirmation = match state.confirmation() {
        Some(confirmation) => confirmation,
        None => return,
    };
    let area = centered_rect(50, 25, size);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::error_text_style(theme))
        .title(Span::styled(confirmation.title(), styling::active_block_title_style()));
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            confirmation.message(),
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled("Enter: confirm  Esc: cancel", styling::muted_text_style(theme))),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn text_input(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let input = match state.text_input() {
        Some(input) => input,
        None => return,
    };
    let area = centered_rect(60, 20, size);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled(input.title.clone(), styling::active_block_title_style()));

    let text = input.text();
    let cursor = input.cursor();
    let before: String = text.chars().take(cursor).collect();
    let at: String = text.chars().skip(cursor).take(1).collect();
    let after: String = text.chars().skip(cursor + 1).collect();
    let cursor_style = styling::active_list_item_style(theme).add_modifier(Modifier::REVERSED);
    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(before, styling::normal_text_style(theme)),
            Span::styled(if at.is_empty() { " ".to_string() } else { at }, cursor_style),
            Span::styled(after, styling::normal_text_style(theme)),
        ]),
        Line::default(),
        Line::from(Span::styled("Enter: apply  Esc: cancel", styling::muted_text_style(theme))),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
