use super::Frame;
use crate::services::dashboard::{DashboardStat, Trend};
use crate::state::State;
use crate::ui::widgets::styling;
use crate::ui::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

/// Render the dashboard: metric cards, pending reviews and the two charts.
///
pub fn dashboard(frame: &mut Frame, size: Rect, state: &State) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(12),
        ])
        .split(size);

    cards(frame, rows[0], state);
    tasks(frame, rows[1], state);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[2]);
    categories(frame, charts[0], state);
    weekly(frame, charts[1], state);
}

fn card<'a>(stat: &DashboardStat, theme: &Theme) -> Paragraph<'a> {
    let (arrow, change_style) = match stat.trend {
        Trend::Up => ("▲", styling::success_text_style(theme)),
        Trend::Down => ("▼", styling::error_text_style(theme)),
        Trend::Neutral => ("•", styling::muted_text_style(theme)),
    };
    Paragraph::new(vec![
        Line::from(Span::styled(
            stat.value.clone(),
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("{} {}", arrow, stat.change), change_style)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title(Span::styled(stat.title.clone(), styling::secondary_text_style(theme))),
    )
}

fn cards(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let stats = state.dashboard().list_dashboard_metrics();
    if stats.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = stats
        .iter()
        .map(|_| Constraint::Ratio(1, stats.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(size);
    for (stat, area) in stats.iter().zip(columns.iter()) {
        frame.render_widget(card(stat, theme), *area);
    }
}

fn tasks(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let header = Row::new(vec!["编号", "项目", "申请人", "金额", "日期", "状态", "风险"])
        .style(styling::secondary_text_style(theme).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .dashboard()
        .pending_tasks()
        .iter()
        .map(|task| {
            let risk_style = if task.is_high_risk() {
                styling::error_text_style(theme)
            } else {
                styling::normal_text_style(theme)
            };
            Row::new(vec![
                Cell::from(task.id.clone()),
                Cell::from(task.project.clone()),
                Cell::from(task.applicant.clone()),
                Cell::from(task.amount.clone()),
                Cell::from(task.date.clone()),
                Cell::from(Span::styled(task.status.label(), styling::badge_style(theme))),
                Cell::from(Span::styled(task.risk_score.to_string(), risk_style)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(theme))
                .title(Span::styled("待审核任务", styling::active_block_title_style())),
        );
    let mut table_state = TableState::default();
    if !state.dashboard().pending_tasks().is_empty() {
        table_state.select(Some(state.dashboard_index()));
    }
    frame.render_stateful_widget(table, size, &mut table_state);
}

fn categories(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let data: Vec<(&str, u64)> = state
        .dashboard()
        .category_breakdown()
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title("资金类别分布"),
        )
        .data(&data)
        .bar_width(6)
        .bar_gap(2)
        .bar_style(styling::banner_style(theme))
        .value_style(styling::badge_style(theme))
        .label_style(styling::secondary_text_style(theme));
    frame.render_widget(chart, size);
}

fn weekly(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title("本周申请 / 发放"),
        )
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .label_style(styling::secondary_text_style(theme));
    for (day, applied, paid) in state.dashboard().weekly_trend() {
        let group = BarGroup::default()
            .label(Line::from(day.clone()))
            .bars(&[
                Bar::default()
                    .value(*applied)
                    .style(styling::banner_style(theme)),
                Bar::default()
                    .value(*paid)
                    .style(styling::success_text_style(theme)),
            ]);
        chart = chart.data(group);
    }
    frame.render_widget(chart, size);
}
