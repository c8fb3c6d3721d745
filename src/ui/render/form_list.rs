use super::Frame;
use crate::services::forms::FormStatus;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

/// Render the form list according to state.
///
pub fn form_list(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let header = Row::new(vec!["编号", "表单名称", "状态", "今日", "累计", "更新时间", "渠道"])
        .style(styling::secondary_text_style(theme).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .catalog()
        .list_forms()
        .iter()
        .map(|form| {
            let status_style = match form.status {
                FormStatus::Active => styling::success_text_style(theme),
                FormStatus::Draft => styling::warning_text_style(theme),
                FormStatus::Ended => styling::muted_text_style(theme),
            };
            let channels = if form.channels.is_empty() {
                "-".to_string()
            } else {
                form.channels.join(",")
            };
            Row::new(vec![
                Cell::from(form.id.clone()),
                Cell::from(form.title.clone()),
                Cell::from(Span::styled(form.status.label(), status_style)),
                Cell::from(form.submit_count_today.to_string()),
                Cell::from(form.submit_count_total.to_string()),
                Cell::from(form.last_updated.clone()),
                Cell::from(channels),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(17),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme))
        .highlight_symbol("▶ ")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(theme))
                .title(Span::styled("表单列表", styling::active_block_title_style())),
        );

    let mut table_state = TableState::default();
    if !state.catalog().list_forms().is_empty() {
        table_state.select(Some(state.forms_index()));
    }
    frame.render_stateful_widget(table, size, &mut table_state);
}
