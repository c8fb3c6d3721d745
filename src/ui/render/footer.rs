use super::Frame;
use crate::config::hotkeys::{bindings_for_view, build_footer_text, HotkeyAction};
use crate::state::{DesignerPane, Focus, State, View};
use crate::ui::widgets::styling;
use crate::ui::ColorSpec;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Footer mode label, its color and the hotkey hints.
///
fn footer_content(state: &State) -> (&'static str, ColorSpec, String) {
    let hotkeys = state.get_hotkeys();
    let theme = state.get_theme();
    use HotkeyAction::*;

    if state.confirmation().is_some() {
        return (
            "CONFIRM:",
            theme.footer_confirm,
            build_footer_text(
                &hotkeys.confirmation,
                &[(Confirm, "confirm", None), (Cancel, "cancel", None)],
            ),
        );
    }
    if state.text_input().is_some() {
        return (
            "INPUT:",
            theme.footer_input,
            format!(
                " Type to edit,{}",
                build_footer_text(
                    &hotkeys.text_input,
                    &[(Submit, "apply", None), (Cancel, "cancel", None)],
                )
            ),
        );
    }
    if state.is_debug_mode() {
        return (
            "LOG:",
            theme.footer_log,
            build_footer_text(
                &hotkeys.log,
                &[
                    (NavigateNext, "navigate", Some(NavigatePrev)),
                    (CopyLog, "copy", None),
                    (ToggleLog, "close", Some(Cancel)),
                ],
            ),
        );
    }
    if state.is_preview_open() {
        return (
            "PREVIEW:",
            theme.footer_preview,
            build_footer_text(
                &hotkeys.preview,
                &[
                    (NavigateNext, "field", Some(NavigatePrev)),
                    (OptionNext, "option", Some(OptionPrev)),
                    (Select, "fill", None),
                    (ClearValue, "clear", None),
                    (PreviewAdvance, "next/submit", None),
                    (PreviewBack, "previous", None),
                    (Cancel, "close", None),
                ],
            ),
        );
    }
    if state.analysis_report().is_some() {
        return (
            "REPORT:",
            theme.footer_preview,
            build_footer_text(
                &hotkeys.analysis,
                &[(Back, "close", Some(GenerateReport))],
            ),
        );
    }
    if state.current_focus() == Focus::Menu {
        return (
            "MENU:",
            theme.footer_normal,
            build_footer_text(
                &hotkeys.menu,
                &[(NavigateNext, "navigate", Some(NavigatePrev)), (Select, "open", None)],
            ) + ","
                + &build_footer_text(&hotkeys.global, &[(CycleTheme, "theme", None), (Quit, "quit", None)]),
        );
    }

    let view = state.current_view();
    let bindings = bindings_for_view(&view, hotkeys);
    let actions: Vec<(HotkeyAction, &str, Option<HotkeyAction>)> = match view {
        View::Dashboard => vec![(NavigateNext, "navigate", Some(NavigatePrev)), (Back, "menu", None)],
        View::Forms => vec![
            (NavigateNext, "navigate", Some(NavigatePrev)),
            (OpenDesigner, "design", None),
            (PreviewForm, "preview", None),
            (OpenChannels, "channels", None),
            (OpenData, "data", None),
            (CreateItem, "new", None),
        ],
        View::Designer => {
            let mut actions = vec![
                (SwitchPaneNext, "pane", Some(SwitchPanePrev)),
                (NavigateNext, "navigate", Some(NavigatePrev)),
                (Select, "select", None),
            ];
            match state.designer_pane() {
                DesignerPane::Library => actions.push((SwitchTabNext, "tab", Some(SwitchTabPrev))),
                DesignerPane::Canvas => actions.extend([
                    (SwitchTabNext, "page", Some(SwitchTabPrev)),
                    (MoveDown, "move", Some(MoveUp)),
                    (DeleteItem, "delete", None),
                    (AddRow, "row", Some(RemoveRow)),
                    (AddPage, "add page", None),
                    (DeletePage, "delete page", None),
                ]),
                DesignerPane::Properties => actions.extend([
                    (SwitchTabNext, "tab", Some(SwitchTabPrev)),
                    (DeleteItem, "remove", None),
                ]),
            }
            actions.extend([
                (OpenSettings, "settings", None),
                (PreviewForm, "preview", None),
                (Save, "save", None),
                (Publish, "publish", None),
            ]);
            actions
        }
        View::Templates => vec![
            (NavigateNext, "navigate", Some(NavigatePrev)),
            (SwitchTabNext, "tab", Some(SwitchTabPrev)),
            (Select, "preview", None),
            (CreateItem, "new", None),
            (EditItem, "edit", None),
            (DeleteItem, "delete", None),
        ],
        View::Publish => vec![
            (NavigateNext, "navigate", Some(NavigatePrev)),
            (ToggleItem, "enable", None),
            (CreateItem, "new channel", None),
            (DeleteItem, "delete", None),
            (CopyLink, "copy link", None),
            (OpenData, "data", None),
        ],
        View::Analysis => vec![
            (NavigateNext, "navigate", Some(NavigatePrev)),
            (ToggleItem, "select", None),
            (ToggleAll, "page", None),
            (CycleFilter, "channel", None),
            (NextPage, "page", Some(PrevPage)),
            (DeleteItem, "delete", None),
            (GenerateReport, "report", None),
        ],
    };
    let text = [
        build_footer_text(bindings, &actions),
        build_footer_text(bindings, &[(Back, "back", None)]),
        build_footer_text(&hotkeys.global, &[(ToggleLog, "log", None), (Quit, "quit", None)]),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .cloned()
    .collect::<Vec<_>>()
    .join(",");

    let (label, color) = match view {
        View::Designer => ("DESIGN:", theme.footer_designer),
        _ => ("NORMAL:", theme.footer_normal),
    };
    (label, color, text)
}

/// Render footer widget.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let (label, color, controls_text) = footer_content(state);

    let controls_content = Line::from(vec![
        Span::styled(label, styling::footer_mode_style(theme, &color)),
        Span::styled(controls_text, Style::default().fg(theme.warning.to_color())),
    ]);
    let controls_widget = Paragraph::new(controls_content).alignment(Alignment::Left);

    let right_content = Line::from(vec![Span::styled(
        format!(" {} v{}", theme.name, env!("CARGO_PKG_VERSION")),
        Style::default().fg(theme.secondary.to_color()),
    )]);
    let right_content_width = right_content.width();
    let right_widget = Paragraph::new(right_content).alignment(Alignment::Right);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(right_content_width.try_into().unwrap_or(0)),
        ])
        .split(size);

    frame.render_widget(controls_widget, columns[0]);
    frame.render_widget(right_widget, columns[1]);
}
