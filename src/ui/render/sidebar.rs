use super::Frame;
use crate::state::{Focus, State, MENU_VIEWS};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

const BLOCK_TITLE: &str = "Menu";

/// Render the sidebar menu according to state.
///
pub fn sidebar(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let focused = state.current_focus() == Focus::Menu;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));

    let list_item_style = if focused {
        block = block
            .border_style(styling::active_block_border_style(theme))
            .title(Span::styled(BLOCK_TITLE, styling::active_block_title_style()));
        styling::active_list_item_style(theme)
    } else {
        block = block.title(BLOCK_TITLE);
        styling::current_list_item_style(theme)
    };

    let current = state.current_view();
    let items: Vec<ListItem> = MENU_VIEWS
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let marker = if *view == current { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, styling::banner_style(theme)),
                Span::raw(format!("{} {}", i + 1, view.title())),
            ]))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(list_item_style)
        .block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.menu_index()));
    frame.render_stateful_widget(list, size, &mut list_state);
}
