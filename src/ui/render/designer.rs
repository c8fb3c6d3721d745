use super::field::field_lines;
use super::{truncate, Frame};
use crate::form::designer::{DesignerMode, LibraryTab, PanelTab};
use crate::form::Designer;
use crate::state::{DesignerPane, PanelEntry, State};
use crate::ui::widgets::styling;
use crate::ui::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

const LIBRARY_WIDTH: u16 = 26;
const PANEL_WIDTH: u16 = 36;

fn pane_block<'a>(title: String, active: bool, theme: &Theme) -> Block<'a> {
    let block = Block::default().borders(Borders::ALL);
    if active {
        block
            .border_style(styling::active_block_border_style(theme))
            .title(Span::styled(title, styling::active_block_title_style()))
    } else {
        block
            .border_style(styling::normal_block_border_style(theme))
            .title(title)
    }
}

/// Render the three-pane designer: library, canvas and property panel.
///
pub fn designer(frame: &mut Frame, size: Rect, state: &State) {
    let designer = match state.designer() {
        Some(designer) => designer,
        None => {
            let theme = state.get_theme();
            frame.render_widget(
                Paragraph::new("No form open").style(styling::muted_text_style(theme)),
                size,
            );
            return;
        }
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LIBRARY_WIDTH),
            Constraint::Min(20),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(size);

    library(frame, columns[0], state, designer);
    canvas(frame, columns[1], state, designer);
    panel(frame, columns[2], state, designer);
}

fn library(frame: &mut Frame, size: Rect, state: &State, designer: &Designer) {
    let theme = state.get_theme();
    let active = state.designer_pane() == DesignerPane::Library;
    let block = pane_block("Library".to_string(), active, theme);
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let tab_index = match designer.library_tab() {
        LibraryTab::Components => 0,
        LibraryTab::Templates => 1,
    };
    let tabs = Tabs::new(vec!["组件", "模板"])
        .select(tab_index)
        .style(styling::secondary_text_style(theme))
        .highlight_style(styling::banner_style(theme));
    frame.render_widget(tabs, rows[0]);

    let width = rows[1].width.saturating_sub(2) as usize;
    let mut items: Vec<ListItem> = vec![];
    // Category headings are not selectable; track the list row of each item.
    let mut selected_row = None;
    match designer.library_tab() {
        LibraryTab::Components => {
            let mut index = 0;
            for category in state.library().categories() {
                items.push(ListItem::new(Line::from(Span::styled(
                    category.name.clone(),
                    styling::muted_text_style(theme).add_modifier(Modifier::BOLD),
                ))));
                for item in &category.items {
                    if index == state.library_index() {
                        selected_row = Some(items.len());
                    }
                    items.push(ListItem::new(format!(" {}", truncate(&item.label, width))));
                    index += 1;
                }
            }
        }
        LibraryTab::Templates => {
            for (index, template) in state.templates().list().iter().enumerate() {
                if index == state.library_index() {
                    selected_row = Some(items.len());
                }
                let marker = if template.is_system() { "◆" } else { "◇" };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", marker), styling::banner_style(theme)),
                    Span::raw(truncate(&template.title, width.saturating_sub(2))),
                ])));
            }
        }
    }

    let highlight = if active {
        styling::active_list_item_style(theme)
    } else {
        styling::current_list_item_style(theme)
    };
    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(highlight);
    let mut list_state = ListState::default();
    list_state.select(selected_row);
    frame.render_stateful_widget(list, rows[1], &mut list_state);
}

fn canvas(frame: &mut Frame, size: Rect, state: &State, designer: &Designer) {
    let theme = state.get_theme();
    let active = state.designer_pane() == DesignerPane::Canvas;
    let document = designer.document();
    let mode = match designer.mode() {
        DesignerMode::Form => "表单",
        DesignerMode::Template => "模板",
    };
    let block = pane_block(format!("Canvas · {}", mode), active, theme);
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let page_bar = if document.pagination_enabled() { 1 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(page_bar),
            Constraint::Min(1),
        ])
        .split(inner);

    let mut heading = vec![Line::from(Span::styled(
        document.title.clone(),
        styling::banner_style(theme),
    ))];
    if !document.description.is_empty() {
        heading.push(Line::from(Span::styled(
            document.description.clone(),
            styling::secondary_text_style(theme),
        )));
    }
    frame.render_widget(Paragraph::new(heading), rows[0]);

    if document.pagination_enabled() {
        let titles: Vec<String> = (1..=document.pages().len())
            .map(|n| format!("第{}页", n))
            .collect();
        let selected = document.page_index(designer.active_page()).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(styling::secondary_text_style(theme))
            .highlight_style(styling::banner_style(theme));
        frame.render_widget(tabs, rows[1]);
    }

    let views = designer.canvas_views();
    if views.is_empty() {
        let empty = Paragraph::new("拖拽或选择左侧组件添加到此处")
            .style(styling::muted_text_style(theme));
        frame.render_widget(empty, rows[2]);
        return;
    }

    let mut lines: Vec<Line> = vec![];
    let mut selected_span = None;
    for view in &views {
        let start = lines.len();
        lines.extend(field_lines(view, None, theme));
        if view.chrome.as_ref().map(|c| c.selected).unwrap_or(false) {
            selected_span = Some((start, lines.len()));
        }
        lines.push(Line::default());
    }

    let height = rows[2].height as usize;
    let scroll = match selected_span {
        Some((_, end)) if end > height => end - height,
        _ => 0,
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, rows[2]);
}

fn panel(frame: &mut Frame, size: Rect, state: &State, designer: &Designer) {
    let theme = state.get_theme();
    let active = state.designer_pane() == DesignerPane::Properties;
    let title = match designer.panel_tab() {
        PanelTab::FieldProperties => "Properties",
        PanelTab::DocumentSettings => "Settings",
    };
    let block = pane_block(title.to_string(), active, theme);
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let width = inner.width.saturating_sub(1) as usize;
    let field = designer.selected_field();
    let items: Vec<ListItem> = state
        .panel_entries()
        .iter()
        .map(|entry| {
            let (label, value) = match (entry, field) {
                (PanelEntry::Property(control), Some(field)) => {
                    (control.label(field), control.display_value(field))
                }
                (PanelEntry::Property(_), None) => (String::new(), String::new()),
                (PanelEntry::Setting(control), _) => (
                    control.label().to_string(),
                    control.display_value(designer.document()),
                ),
            };
            ListItem::new(vec![
                Line::from(Span::styled(label, styling::secondary_text_style(theme))),
                Line::from(Span::styled(
                    format!("  {}", truncate(&value, width.saturating_sub(2))),
                    styling::normal_text_style(theme),
                )),
            ])
        })
        .collect();

    let highlight = if active {
        styling::active_list_item_style(theme)
    } else {
        styling::current_list_item_style(theme)
    };
    let list = List::new(items).highlight_style(highlight);
    let mut list_state = ListState::default();
    if active {
        list_state.select(Some(state.property_index()));
    }
    frame.render_stateful_widget(list, inner, &mut list_state);
}
