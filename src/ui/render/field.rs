//! Terminal drawing of a `FieldView`.
//!
//! The same code draws the design canvas and the preview: the view carries the
//! design chrome or not, and `FillContext` supplies entered values in preview.

use crate::form::fill::{FillState, FillValue};
use crate::form::render::{ChoiceStyle, FieldBody, FieldView, SubTableView};
use crate::ui::widgets::styling;
use crate::ui::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Preview values and cursor for one field.
///
#[derive(Debug, Clone, Copy)]
pub struct FillContext<'a> {
    pub fill: &'a FillState,
    pub focused: bool,
    pub option_index: usize,
    pub issue: Option<&'a str>,
}

/// Maximum number of empty lines drawn for a multi-line input.
const MAX_TEXTAREA_LINES: u16 = 3;

fn input_box(content: &str, filled: bool, theme: &Theme) -> Span<'static> {
    let style = if filled {
        styling::normal_text_style(theme)
    } else {
        styling::muted_text_style(theme)
    };
    Span::styled(format!("[ {} ]", content), style)
}

/// Return the entered text, or the placeholder when nothing was entered.
///
fn text_or_placeholder(
    view: &FieldView,
    placeholder: &str,
    ctx: Option<FillContext<'_>>,
) -> (String, bool) {
    match ctx.map(|c| c.fill.text(&view.id)) {
        Some(text) if !text.is_empty() => (text.to_string(), true),
        _ => (placeholder.to_string(), false),
    }
}

fn header(view: &FieldView, theme: &Theme) -> Line<'static> {
    let mut spans = vec![];
    if let Some(chrome) = &view.chrome {
        if chrome.drag_handle {
            spans.push(Span::styled("⠿ ", styling::muted_text_style(theme)));
        }
    }
    spans.push(Span::styled(
        view.label.clone(),
        styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
    ));
    if view.required {
        spans.push(Span::styled(" *", styling::error_text_style(theme)));
    }
    if let Some(chrome) = &view.chrome {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} ", chrome.kind_badge),
            styling::badge_style(theme),
        ));
        if chrome.delete_affordance {
            spans.push(Span::styled("  ✕ d", styling::error_text_style(theme)));
        }
    }
    Line::from(spans)
}

fn option_lines(
    view: &FieldView,
    style: ChoiceStyle,
    options: &[String],
    ctx: Option<FillContext<'_>>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let chosen = |index: usize| match ctx.and_then(|c| c.fill.value(&view.id)) {
        Some(FillValue::Choice(selected)) => *selected == index,
        Some(FillValue::Choices(selected)) => selected.contains(&index),
        _ => false,
    };
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = match (style, chosen(i)) {
                (ChoiceStyle::Radio, true) => "(•)",
                (ChoiceStyle::Radio, false) => "( )",
                (ChoiceStyle::Checkbox, true) => "[x]",
                (ChoiceStyle::Checkbox, false) => "[ ]",
            };
            let focused = ctx.map(|c| c.focused && c.option_index == i).unwrap_or(false);
            let style = if focused {
                styling::active_list_item_style(theme)
            } else {
                styling::normal_text_style(theme)
            };
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{} {}", marker, option), style),
            ])
        })
        .collect()
}

fn sub_table_lines(table: &SubTableView, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![];
    let mut head = vec![Span::styled("  # ", styling::muted_text_style(theme))];
    for column in &table.columns {
        head.push(Span::styled(
            format!("│ {} ", column.label),
            styling::secondary_text_style(theme).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(head));

    if let Some(message) = table.empty_message {
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            styling::muted_text_style(theme),
        )));
    }
    for (position, _) in table.rows.iter().enumerate() {
        let mut row = vec![Span::styled(
            format!("  {} ", position + 1),
            styling::muted_text_style(theme),
        )];
        for column in &table.columns {
            let width = column.label.chars().count().max(4);
            row.push(Span::styled(
                format!("│ {} ", "_".repeat(width)),
                styling::muted_text_style(theme),
            ));
        }
        lines.push(Line::from(row));
    }

    let add_style = if table.add_control.enabled {
        styling::banner_style(theme)
    } else {
        styling::muted_text_style(theme)
    };
    lines.push(Line::from(vec![
        Span::styled(format!("  [{}]", table.add_control.label), add_style),
        Span::styled(
            format!("  {}/{}", table.rows.len(), table.max_rows),
            styling::muted_text_style(theme),
        ),
    ]));
    lines
}

fn body_lines(view: &FieldView, ctx: Option<FillContext<'_>>, theme: &Theme) -> Vec<Line<'static>> {
    let muted = styling::muted_text_style(theme);
    match &view.body {
        FieldBody::Text {
            placeholder,
            max_length,
        } => {
            let (content, filled) = text_or_placeholder(view, placeholder, ctx);
            let count = if filled { content.chars().count() } else { 0 };
            vec![Line::from(vec![
                input_box(&content, filled, theme),
                Span::styled(format!(" {}/{}", count, max_length), muted),
            ])]
        }
        FieldBody::TextArea {
            placeholder,
            rows,
            max_length,
        } => {
            let (content, filled) = text_or_placeholder(view, placeholder, ctx);
            let count = if filled { content.chars().count() } else { 0 };
            let mut lines = vec![Line::from(input_box(&content, filled, theme))];
            for _ in 1..(*rows).min(MAX_TEXTAREA_LINES) {
                lines.push(Line::from(Span::styled("[ ]", muted)));
            }
            lines.push(Line::from(Span::styled(
                format!("{} rows · {}/{}", rows, count, max_length),
                muted,
            )));
            lines
        }
        FieldBody::Number { placeholder, unit } => {
            let (content, filled) = text_or_placeholder(view, placeholder, ctx);
            let mut spans = vec![input_box(&content, filled, theme)];
            if let Some(unit) = unit {
                spans.push(Span::styled(format!(" {}", unit), styling::secondary_text_style(theme)));
            }
            vec![Line::from(spans)]
        }
        FieldBody::Money {
            placeholder,
            currency,
            thousands,
        } => {
            let (content, filled) = text_or_placeholder(view, placeholder, ctx);
            let mut spans = vec![
                Span::styled(format!("{} ", currency), styling::secondary_text_style(theme)),
                input_box(&content, filled, theme),
            ];
            if *thousands {
                spans.push(Span::styled(" 1,000", muted));
            }
            vec![Line::from(spans)]
        }
        FieldBody::Choice { style, options } => option_lines(view, *style, options, ctx, theme),
        FieldBody::Dropdown {
            placeholder,
            options,
        } => {
            let selected = match ctx.and_then(|c| c.fill.value(&view.id)) {
                Some(FillValue::Choice(index)) => options.get(*index).cloned(),
                _ => None,
            };
            let filled = selected.is_some();
            let content = selected.unwrap_or_else(|| placeholder.clone());
            let mut lines = vec![Line::from(input_box(&format!("{} ▾", content), filled, theme))];
            if ctx.map(|c| c.focused).unwrap_or(false) {
                lines.extend(option_lines(view, ChoiceStyle::Radio, options, ctx, theme));
            }
            lines
        }
        FieldBody::Date { placeholder, hint } => {
            let (content, filled) = text_or_placeholder(view, placeholder, ctx);
            vec![Line::from(vec![
                input_box(&format!("{} ▦", content), filled, theme),
                Span::styled(format!(" {}", hint), muted),
            ])]
        }
        FieldBody::Upload {
            placeholder,
            accepted,
            max_size_mb,
            max_count,
        } => {
            let files = ctx.map(|c| c.fill.file_count(&view.id)).unwrap_or(0);
            let content = if files > 0 {
                format!("⇪ {} file(s) attached", files)
            } else {
                format!("⇪ {}", placeholder)
            };
            vec![
                Line::from(input_box(&content, files > 0, theme)),
                Line::from(Span::styled(
                    format!(
                        "{} · ≤ {}MB · max {} file(s)",
                        accepted.join("/"),
                        max_size_mb,
                        max_count
                    ),
                    muted,
                )),
            ]
        }
        FieldBody::Signature { prompt } => {
            let signed = ctx.map(|c| c.fill.is_signed(&view.id)).unwrap_or(false);
            if signed {
                vec![Line::from(Span::styled("✔ 已签名", styling::success_text_style(theme)))]
            } else {
                vec![Line::from(input_box(&format!("✍ {}", prompt), false, theme))]
            }
        }
        FieldBody::SubTable(table) => sub_table_lines(table, theme),
    }
}

/// Draw one field as lines of text.
///
pub fn field_lines(view: &FieldView, ctx: Option<FillContext<'_>>, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, theme)];
    if let Some(description) = &view.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            styling::muted_text_style(theme).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.extend(body_lines(view, ctx, theme));
    if let Some(issue) = ctx.and_then(|c| c.issue) {
        lines.push(Line::from(Span::styled(
            format!("! {}", issue),
            styling::error_text_style(theme),
        )));
    }

    let highlighted = view.chrome.as_ref().map(|c| c.selected).unwrap_or(false)
        || ctx.map(|c| c.focused).unwrap_or(false);
    if highlighted {
        let bg = Style::default().bg(theme.highlight_bg.to_color());
        for line in lines.iter_mut() {
            for span in line.spans.iter_mut() {
                span.style = span.style.patch(bg);
            }
        }
    }
    lines
}
