use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

/// Render the channel management screen of a published form.
///
pub fn publish(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(size);

    let (title, form_id) = match state.publish_target() {
        Some(target) => (
            target.form_title.clone(),
            target.form_id.clone().unwrap_or_else(|| "未保存".to_string()),
        ),
        None => ("未选择表单".to_string(), "-".to_string()),
    };
    let heading = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("✓ 发布成功  ", styling::success_text_style(theme)),
            Span::styled(title, styling::banner_style(theme)),
        ]),
        Line::from(Span::styled(
            format!("表单编号 {}", form_id),
            styling::muted_text_style(theme),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title("Publish"),
    );
    frame.render_widget(heading, rows[0]);

    let header = Row::new(vec!["编号", "渠道名称", "标识", "浏览", "提交", "创建时间", "状态"])
        .style(styling::secondary_text_style(theme).add_modifier(Modifier::BOLD));
    let table_rows: Vec<Row> = state
        .channels()
        .list_channels()
        .iter()
        .map(|channel| {
            let name = if channel.is_system {
                format!("{} (系统)", channel.name)
            } else {
                channel.name.clone()
            };
            let status_style = if channel.active {
                styling::success_text_style(theme)
            } else {
                styling::muted_text_style(theme)
            };
            Row::new(vec![
                Cell::from(channel.id.clone()),
                Cell::from(name),
                Cell::from(channel.tag.clone()),
                Cell::from(channel.views.to_string()),
                Cell::from(channel.submissions.to_string()),
                Cell::from(channel.create_time.clone()),
                Cell::from(Span::styled(channel.status_label(), status_style)),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(17),
        Constraint::Length(9),
    ];
    let table = Table::new(table_rows, widths)
        .header(header)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(theme))
                .title(Span::styled("渠道管理", styling::active_block_title_style())),
        );
    let mut table_state = TableState::default();
    if !state.channels().list_channels().is_empty() {
        table_state.select(Some(state.channel_index()));
    }
    frame.render_stateful_widget(table, rows[1], &mut table_state);

    let link = match state.selected_channel() {
        Some(channel) => state.channel_link(channel),
        None => String::new(),
    };
    let link_widget = Paragraph::new(Line::from(Span::styled(
        link,
        styling::normal_text_style(theme).add_modifier(Modifier::UNDERLINED),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title("分享链接"),
    );
    frame.render_widget(link_widget, rows[2]);
}
