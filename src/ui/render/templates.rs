use super::field::field_lines;
use super::{truncate, Frame};
use crate::form::render::{field_body, FieldView};
use crate::form::template::{ComponentTemplate, TemplateField};
use crate::form::FieldId;
use crate::state::{State, TemplateTab};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

/// Fill-mode view of a template field, used for the read-only preview.
///
fn template_field_view(index: usize, field: &TemplateField) -> FieldView {
    FieldView {
        id: FieldId::from(format!("tpl_preview_{}", index).as_str()),
        kind: field.kind(),
        label: field.label.clone(),
        required: field.default_config.required(),
        description: field.default_config.common().description.clone(),
        body: field_body(&field.default_config, None),
        chrome: None,
        inputs_enabled: false,
    }
}

/// Render the template library according to state.
///
pub fn templates(frame: &mut Frame, size: Rect, state: &State) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(size);
    template_list(frame, columns[0], state);
    if let Some(template) = state.selected_template() {
        details(frame, columns[1], state, template);
    }
}

fn template_list(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled("组件模版库", styling::active_block_title_style()));
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let tab_index = match state.template_tab() {
        TemplateTab::System => 0,
        TemplateTab::Custom => 1,
    };
    let tabs = Tabs::new(vec!["系统模版", "我的模版"])
        .select(tab_index)
        .style(styling::secondary_text_style(theme))
        .highlight_style(styling::banner_style(theme));
    frame.render_widget(tabs, rows[0]);

    let width = rows[1].width.saturating_sub(4) as usize;
    let templates = state.templates_in_tab();
    let items: Vec<ListItem> = templates
        .iter()
        .map(|template| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(truncate(&template.title, width)),
                    Span::styled(
                        format!("  {} 个字段", template.fields.len()),
                        styling::muted_text_style(theme),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", template.category),
                    styling::secondary_text_style(theme),
                )),
            ])
        })
        .collect();

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new("暂无模版").style(styling::muted_text_style(theme)),
            rows[1],
        );
        return;
    }

    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme));
    let mut list_state = ListState::default();
    list_state.select(Some(state.template_index()));
    frame.render_stateful_widget(list, rows[1], &mut list_state);
}

fn details(frame: &mut Frame, size: Rect, state: &State, template: &ComponentTemplate) {
    let theme = state.get_theme();
    let title = if state.is_template_preview() {
        "Preview"
    } else {
        "Details"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme))
        .title(title);

    let mut lines = vec![
        Line::from(Span::styled(template.title.clone(), styling::banner_style(theme))),
        Line::from(Span::styled(
            template.description.clone(),
            styling::secondary_text_style(theme),
        )),
    ];
    if let Some(created) = &template.create_time {
        lines.push(Line::from(Span::styled(
            format!("创建于 {}", created),
            styling::muted_text_style(theme),
        )));
    }
    if template.is_system() {
        lines.push(Line::from(Span::styled("系统模版 · 只读", styling::badge_style(theme))));
    }
    lines.push(Line::default());

    if state.is_template_preview() {
        for (index, field) in template.fields.iter().enumerate() {
            lines.extend(field_lines(&template_field_view(index, field), None, theme));
            lines.push(Line::default());
        }
    } else {
        for field in &template.fields {
            lines.push(Line::from(vec![
                Span::styled("• ", styling::banner_style(theme)),
                Span::raw(field.label.clone()),
                Span::styled(
                    format!("  {}", field.kind().display_name()),
                    styling::muted_text_style(theme),
                ),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .style(styling::normal_text_style(theme))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::template::TemplateStore;

    #[test]
    fn test_template_field_view_is_read_only() {
        let store = TemplateStore::seeded();
        let template = &store.list()[0];
        let view = template_field_view(0, &template.fields[0]);
        assert!(view.chrome.is_none());
        assert!(!view.inputs_enabled);
        assert_eq!(view.label, template.fields[0].label);
    }
}
