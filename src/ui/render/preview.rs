use super::field::{field_lines, FillContext};
use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the fill-mode preview of the open document.
///
pub fn preview(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let designer = match state.designer() {
        Some(designer) => designer,
        None => return,
    };
    let preview = match designer.preview() {
        Some(preview) => preview,
        None => return,
    };
    let document = designer.document();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled(
            format!("Preview · {}", document.title),
            styling::active_block_title_style(),
        ));
    let inner = block.inner(size);
    frame.render_widget(block, size);

    if preview.is_submitted() {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                format!("✓ {}", document.success_title),
                styling::success_text_style(theme).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                document.success_description.clone(),
                styling::secondary_text_style(theme),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let mut heading = vec![];
    if document.cover_enabled {
        let cover = document.cover_image_ref.as_deref().unwrap_or("默认封面");
        heading.push(Line::from(Span::styled(
            format!("[封面: {}]", cover),
            styling::muted_text_style(theme),
        )));
    }
    heading.push(Line::from(Span::styled(
        document.title.clone(),
        styling::banner_style(theme),
    )));
    heading.push(Line::from(Span::styled(
        document.description.clone(),
        styling::secondary_text_style(theme),
    )));
    frame.render_widget(Paragraph::new(heading).wrap(Wrap { trim: true }), rows[0]);

    let mut lines: Vec<Line> = vec![];
    let mut focus_end = 0;
    for (index, view) in designer.preview_views().iter().enumerate() {
        let focused = index == preview.cursor();
        let ctx = FillContext {
            fill: preview.fill(),
            focused,
            option_index: state.option_index(),
            issue: preview.issue_for(&view.id).map(|i| i.message.as_str()),
        };
        lines.extend(field_lines(view, Some(ctx), theme));
        if focused {
            focus_end = lines.len();
        }
        lines.push(Line::default());
    }
    let height = rows[1].height as usize;
    let scroll = focus_end.saturating_sub(height).min(u16::MAX as usize) as u16;
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        rows[1],
    );

    let pages = designer.preview_page_count().max(1);
    let last = preview.page_index() + 1 >= pages;
    let mut status = vec![Span::styled(
        format!("第 {}/{} 页", preview.page_index() + 1, pages),
        styling::secondary_text_style(theme),
    )];
    status.push(Span::styled(
        if last { "  [提交]" } else { "  [下一页]" },
        styling::banner_style(theme),
    ));
    if !preview.issues().is_empty() {
        status.push(Span::styled(
            format!("  {} 项未通过校验", preview.issues().len()),
            styling::error_text_style(theme),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        rows[2],
    );
}
