use super::{centered_rect, truncate, Frame};
use crate::services::submissions::AnalysisReport;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, TableState, Wrap},
};

/// Render the analysis screen: metrics, trend, submission table and
/// visitor breakdowns.
///
pub fn analysis(frame: &mut Frame, size: Rect, state: &State) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(size);

    metrics(frame, rows[0], state);
    trend(frame, rows[1], state);
    submissions(frame, rows[2], state);
    breakdowns(frame, rows[3], state);

    if let Some(report) = state.analysis_report() {
        report_overlay(frame, size, state, report);
    }
}

fn report_overlay(frame: &mut Frame, size: Rect, state: &State, report: &AnalysisReport) {
    let theme = state.get_theme();
    let heading = styling::banner_style(theme).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} - 数据结项报告", report.form_title),
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("生成时间：{}", report.generated_on),
            styling::muted_text_style(theme),
        )),
        Line::default(),
        Line::from(Span::styled("一、数据概览", heading)),
        Line::from(format!(
            "  总回收量：{}    完成率：{}",
            report.metrics.recovery, report.metrics.completion_rate
        )),
        Line::from(format!(
            "  浏览量：{}    平均用时：{}",
            report.metrics.views, report.metrics.avg_time
        )),
        Line::default(),
        Line::from(Span::styled("二、主要结论", heading)),
    ];
    lines.extend(
        report
            .conclusions
            .iter()
            .map(|c| Line::from(format!("  • {}", c))),
    );

    let area = centered_rect(70, 60, size);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled("分析报告预览", styling::active_block_title_style()));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .style(styling::normal_text_style(theme))
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn metrics(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let m = state.submissions().analysis_metrics();
    let items = [
        ("回收量", m.recovery.to_string()),
        ("浏览量", m.views.to_string()),
        ("平均用时", m.avg_time),
        ("完成率", m.completion_rate),
    ];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(size);
    for ((title, value), area) in items.into_iter().zip(columns.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title(Span::styled(title, styling::secondary_text_style(theme))),
        );
        frame.render_widget(widget, *area);
    }
}

fn trend(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let trend = state.submissions().trend();
    let data: Vec<u64> = trend.iter().map(|(_, value)| *value).collect();
    let range = match (trend.first(), trend.last()) {
        (Some((first, _)), Some((last, _))) => format!("回收趋势 {} ~ {}", first, last),
        _ => "回收趋势".to_string(),
    };
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title(range),
        )
        .data(&data)
        .style(styling::banner_style(theme));
    frame.render_widget(sparkline, size);
}

fn submissions(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let page = state.current_submission_page();
    let headers = state.submissions().headers();

    let mut header_cells = vec![
        Cell::from(" "),
        Cell::from("编号"),
        Cell::from("提交时间"),
        Cell::from("渠道"),
    ];
    header_cells.extend(headers.iter().map(|h| Cell::from(h.clone())));
    let header =
        Row::new(header_cells).style(styling::secondary_text_style(theme).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|submission| {
            let marker = if state.is_submission_selected(&submission.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut cells = vec![
                Cell::from(marker),
                Cell::from(submission.id.clone()),
                Cell::from(submission.submit_time.clone()),
                Cell::from(truncate(&submission.channel_name, 14)),
            ];
            cells.extend(
                headers
                    .iter()
                    .map(|h| Cell::from(truncate(submission.answer(h), 12))),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Length(17),
        Constraint::Length(15),
    ];
    widths.extend(headers.iter().map(|_| Constraint::Min(6)));

    let filter = state
        .submission_filter()
        .channel
        .clone()
        .unwrap_or_else(|| "全部渠道".to_string());
    let title = format!(
        "数据明细 · {} · 第 {}/{} 页 · 共 {} 条 · 已选 {}",
        filter,
        page.page,
        page.page_count,
        page.total,
        state.selected_submission_count()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(theme))
                .title(Span::styled(title, styling::active_block_title_style())),
        );
    let mut table_state = TableState::default();
    if !page.rows.is_empty() {
        table_state.select(Some(state.submission_cursor()));
    }
    frame.render_stateful_widget(table, size, &mut table_state);
}

fn breakdowns(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let breakdowns = state.submissions().breakdowns();
    if breakdowns.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = breakdowns
        .iter()
        .map(|_| Constraint::Ratio(1, breakdowns.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(size);

    for (breakdown, area) in breakdowns.iter().zip(columns.iter()) {
        let total: u64 = breakdown.items.iter().map(|(_, v)| *v).sum::<u64>().max(1);
        let lines: Vec<Line> = breakdown
            .items
            .iter()
            .map(|(name, value)| {
                let percent = value * 100 / total;
                Line::from(vec![
                    Span::raw(truncate(name, 8)),
                    Span::styled(format!(" {}%", percent), styling::muted_text_style(theme)),
                ])
            })
            .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title(breakdown.title.clone()),
        );
        frame.render_widget(widget, *area);
    }
}
