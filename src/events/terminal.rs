use crate::config::hotkeys::{get_action_for_event, get_action_for_special_mode, SpecialMode};
use crate::config::HotkeyAction;
use crate::form::document::MoveDirection;
use crate::state::{Focus, State, View};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            if let Ok(true) = event::poll(tick_rate) {
                if let Ok(CrosstermEvent::Key(key)) = event::read() {
                    if tx_clone.send(Event::Input(key)).is_err() {
                        break;
                    }
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) => {
                if event.kind != KeyEventKind::Press {
                    return Ok(true);
                }
                Ok(handle_key(state, &event))
            }
            Event::Tick => {
                state.tick();
                Ok(true)
            }
        }
    }
}

/// Route one key press through the modal layers and the active view.
/// Returns false when exit was requested.
///
pub fn handle_key(state: &mut State, event: &KeyEvent) -> bool {
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        debug!("Processing exit terminal event '{:?}'...", event);
        return false;
    }
    let hotkeys = state.get_hotkeys().clone();

    if state.confirmation().is_some() {
        match get_action_for_special_mode(event, SpecialMode::Confirmation, &hotkeys) {
            Some(HotkeyAction::Confirm) => {
                state.confirm();
            }
            Some(HotkeyAction::Cancel) => {
                state.cancel_confirmation();
            }
            _ => debug!("Ignoring '{:?}' while a confirmation is open", event.code),
        }
        return true;
    }

    if state.text_input().is_some() {
        handle_text_input(state, event, &hotkeys);
        return true;
    }

    if state.is_debug_mode() {
        match get_action_for_special_mode(event, SpecialMode::Log, &hotkeys) {
            Some(HotkeyAction::NavigateNext) => {
                state.next_debug_entry();
            }
            Some(HotkeyAction::NavigatePrev) => {
                state.previous_debug_entry();
            }
            Some(HotkeyAction::CopyLog) => {
                state.copy_debug_entry();
            }
            Some(HotkeyAction::ToggleLog) | Some(HotkeyAction::Cancel) => {
                state.toggle_debug_mode();
            }
            _ => {}
        }
        return true;
    }

    if state.is_preview_open() {
        handle_preview(state, event, &hotkeys);
        return true;
    }

    if state.analysis_report().is_some() {
        match get_action_for_event(event, &View::Analysis, &hotkeys) {
            Some(HotkeyAction::Quit) => return false,
            Some(HotkeyAction::Back) | Some(HotkeyAction::GenerateReport) => {
                state.close_report();
            }
            _ => debug!("Ignoring '{:?}' while the report is open", event.code),
        }
        return true;
    }

    let action = if state.current_focus() == Focus::Menu {
        get_action_for_special_mode(event, SpecialMode::Menu, &hotkeys)
    } else {
        get_action_for_event(event, &state.current_view(), &hotkeys)
    };
    let action = match action {
        Some(action) => action,
        None => {
            debug!("Skipping processing of terminal event '{:?}'...", event);
            return true;
        }
    };
    debug!("Processing action {:?}", action);

    match action {
        HotkeyAction::Quit => return false,
        HotkeyAction::CycleTheme => {
            state.cycle_theme();
        }
        HotkeyAction::ToggleLog => {
            state.toggle_debug_mode();
        }
        HotkeyAction::GoDashboard => {
            state.jump_to(View::Dashboard);
        }
        HotkeyAction::GoForms => {
            state.jump_to(View::Forms);
        }
        HotkeyAction::GoTemplates => {
            state.jump_to(View::Templates);
        }
        HotkeyAction::GoAnalysis => {
            state.jump_to(View::Analysis);
        }
        _ if state.current_focus() == Focus::Menu => handle_menu(state, action),
        _ => match state.current_view() {
            View::Dashboard => handle_dashboard(state, action),
            View::Forms => handle_forms(state, action),
            View::Designer => handle_designer(state, action),
            View::Templates => handle_templates(state, action),
            View::Publish => handle_publish(state, action),
            View::Analysis => handle_analysis(state, action),
        },
    }
    true
}

fn handle_text_input(state: &mut State, event: &KeyEvent, hotkeys: &crate::config::ViewHotkeys) {
    match get_action_for_special_mode(event, SpecialMode::TextInput, hotkeys) {
        Some(HotkeyAction::Submit) => {
            state.submit_text_input();
            return;
        }
        Some(HotkeyAction::Cancel) => {
            state.cancel_text_input();
            return;
        }
        _ => {}
    }
    let input = match state.text_input_mut() {
        Some(input) => input,
        None => return,
    };
    match event.code {
        KeyCode::Char(c)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            input.insert_char(c)
        }
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_next_char(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

fn handle_preview(state: &mut State, event: &KeyEvent, hotkeys: &crate::config::ViewHotkeys) {
    match get_action_for_special_mode(event, SpecialMode::Preview, hotkeys) {
        Some(HotkeyAction::NavigateNext) => {
            state.navigate_preview(true);
        }
        Some(HotkeyAction::NavigatePrev) => {
            state.navigate_preview(false);
        }
        Some(HotkeyAction::OptionNext) => {
            state.navigate_preview_option(true);
        }
        Some(HotkeyAction::OptionPrev) => {
            state.navigate_preview_option(false);
        }
        Some(HotkeyAction::Select) => {
            state.activate_preview_field();
        }
        Some(HotkeyAction::RemoveRow) | Some(HotkeyAction::ClearValue) => {
            state.clear_preview_field();
        }
        Some(HotkeyAction::PreviewAdvance) => {
            state.preview_advance();
        }
        Some(HotkeyAction::PreviewBack) => {
            state.preview_back();
        }
        Some(HotkeyAction::Cancel) => {
            state.close_preview();
        }
        _ => {}
    }
}

fn handle_menu(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.next_menu();
        }
        HotkeyAction::NavigatePrev => {
            state.previous_menu();
        }
        HotkeyAction::Select => {
            state.select_menu();
        }
        _ => {}
    }
}

fn handle_dashboard(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_dashboard(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_dashboard(false);
        }
        HotkeyAction::Back => {
            state.back();
        }
        _ => {}
    }
}

fn handle_forms(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_forms(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_forms(false);
        }
        HotkeyAction::OpenDesigner | HotkeyAction::EditItem => {
            state.edit_selected_form();
        }
        HotkeyAction::PreviewForm => {
            state.preview_selected_form();
        }
        HotkeyAction::OpenChannels => {
            state.open_channels_for_selected();
        }
        HotkeyAction::OpenData => {
            state.open_data_for_selected();
        }
        HotkeyAction::CreateItem => {
            state.create_form();
        }
        HotkeyAction::Back => {
            state.back();
        }
        _ => {}
    }
}

fn handle_designer(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_designer(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_designer(false);
        }
        HotkeyAction::Select => {
            state.designer_select();
        }
        HotkeyAction::SwitchPaneNext => {
            state.switch_pane(true);
        }
        HotkeyAction::SwitchPanePrev => {
            state.switch_pane(false);
        }
        HotkeyAction::SwitchTabNext => {
            state.switch_designer_tab(true);
        }
        HotkeyAction::SwitchTabPrev => {
            state.switch_designer_tab(false);
        }
        HotkeyAction::MoveUp => {
            state.move_selected_field(MoveDirection::Up);
        }
        HotkeyAction::MoveDown => {
            state.move_selected_field(MoveDirection::Down);
        }
        HotkeyAction::DeleteItem => {
            state.designer_delete();
        }
        HotkeyAction::AddRow => {
            state.add_canvas_row();
        }
        HotkeyAction::RemoveRow => {
            state.remove_canvas_row();
        }
        HotkeyAction::AddPage => {
            state.add_page();
        }
        HotkeyAction::DeletePage => {
            state.request_delete_page();
        }
        HotkeyAction::OpenSettings => {
            state.open_document_settings();
        }
        HotkeyAction::PreviewForm => {
            state.open_preview();
        }
        HotkeyAction::Save => {
            state.save_designer();
        }
        HotkeyAction::Publish => {
            state.publish_designer();
        }
        HotkeyAction::Back => {
            let selected = state
                .designer()
                .map(|d| d.selected_id().is_some())
                .unwrap_or(false);
            if selected {
                state.clear_canvas_selection();
            } else {
                state.back();
            }
        }
        _ => {}
    }
}

fn handle_templates(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_templates(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_templates(false);
        }
        HotkeyAction::SwitchTabNext | HotkeyAction::SwitchTabPrev => {
            state.switch_template_tab();
        }
        HotkeyAction::Select => {
            state.toggle_template_preview();
        }
        HotkeyAction::CreateItem => {
            state.create_template();
        }
        HotkeyAction::EditItem => {
            state.edit_selected_template();
        }
        HotkeyAction::DeleteItem => {
            state.request_delete_template();
        }
        HotkeyAction::Back => {
            state.back();
        }
        _ => {}
    }
}

fn handle_publish(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_channels(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_channels(false);
        }
        HotkeyAction::ToggleItem => {
            state.toggle_selected_channel();
        }
        HotkeyAction::CreateItem => {
            state.start_channel_creation();
        }
        HotkeyAction::DeleteItem => {
            state.request_delete_channel();
        }
        HotkeyAction::CopyLink => {
            state.copy_selected_link();
        }
        HotkeyAction::OpenData => {
            state.open_data_for_channel();
        }
        HotkeyAction::Back => {
            state.back();
        }
        _ => {}
    }
}

fn handle_analysis(state: &mut State, action: HotkeyAction) {
    match action {
        HotkeyAction::NavigateNext => {
            state.navigate_submissions(true);
        }
        HotkeyAction::NavigatePrev => {
            state.navigate_submissions(false);
        }
        HotkeyAction::ToggleItem => {
            state.toggle_submission();
        }
        HotkeyAction::ToggleAll => {
            state.toggle_all_submissions();
        }
        HotkeyAction::CycleFilter => {
            state.cycle_submission_filter();
        }
        HotkeyAction::NextPage => {
            state.change_submission_page(true);
        }
        HotkeyAction::PrevPage => {
            state.change_submission_page(false);
        }
        HotkeyAction::DeleteItem => {
            state.request_delete_submissions();
        }
        HotkeyAction::GenerateReport => {
            state.open_report();
        }
        HotkeyAction::Back => {
            state.back();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Confirmation, DesignerPane};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut State, c: char) -> bool {
        handle_key(state, &key(KeyCode::Char(c)))
    }

    #[test]
    fn test_quit_and_ctrl_c() {
        let mut state = State::default();
        assert!(!press(&mut state, 'q'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_key(&mut state, &ctrl_c));
    }

    #[test]
    fn test_global_jumps() {
        let mut state = State::default();
        press(&mut state, '2');
        assert_eq!(state.current_view(), View::Forms);
        press(&mut state, '4');
        assert_eq!(state.current_view(), View::Analysis);
    }

    #[test]
    fn test_menu_focus_routes_to_menu() {
        let mut state = State::default();
        handle_key(&mut state, &key(KeyCode::Esc));
        assert_eq!(state.current_focus(), Focus::Menu);
        press(&mut state, 'j');
        handle_key(&mut state, &key(KeyCode::Enter));
        assert_eq!(state.current_view(), View::Forms);
        assert_eq!(state.current_focus(), Focus::View);
    }

    #[test]
    fn test_text_input_captures_quit_key() {
        let mut state = State::default();
        press(&mut state, '2');
        handle_key(&mut state, &key(KeyCode::Enter));
        press(&mut state, 'P');
        assert_eq!(state.current_view(), View::Publish);
        press(&mut state, 'n');
        assert!(state.text_input().is_some());
        assert!(press(&mut state, 'q'));
        assert_eq!(state.text_input().unwrap().text(), "q");
        handle_key(&mut state, &key(KeyCode::Backspace));
        assert_eq!(state.text_input().unwrap().text(), "");
        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(state.text_input().is_none());
    }

    #[test]
    fn test_report_overlay_keys() {
        let mut state = State::default();
        press(&mut state, '4');
        press(&mut state, 'r');
        assert!(state.analysis_report().is_some());
        press(&mut state, 'j');
        assert_eq!(state.submission_cursor(), 0);
        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(state.analysis_report().is_none());
        assert_eq!(state.current_view(), View::Analysis);
    }

    #[test]
    fn test_publish_data_key_opens_filtered_analysis() {
        let mut state = State::default();
        press(&mut state, '2');
        press(&mut state, 'c');
        assert_eq!(state.current_view(), View::Publish);
        press(&mut state, 'v');
        assert_eq!(state.current_view(), View::Analysis);
        assert!(state.submission_filter().channel.is_some());
    }

    #[test]
    fn test_confirmation_swallows_other_keys() {
        let mut state = State::default();
        press(&mut state, '2');
        press(&mut state, 'n');
        press(&mut state, 'j');
        press(&mut state, 'd');
        assert!(matches!(
            state.confirmation(),
            Some(Confirmation::DeleteField { .. })
        ));
        assert!(press(&mut state, 'q'));
        assert!(state.confirmation().is_some());
        handle_key(&mut state, &key(KeyCode::Enter));
        assert!(state.designer().unwrap().document().fields().is_empty());
    }

    #[test]
    fn test_designer_escape_clears_selection_first() {
        let mut state = State::default();
        press(&mut state, '2');
        press(&mut state, 'n');
        press(&mut state, 'j');
        handle_key(&mut state, &key(KeyCode::Tab));
        assert_eq!(state.designer_pane(), DesignerPane::Properties);
        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(state.designer().unwrap().selected_id().is_none());
        assert_eq!(state.current_view(), View::Designer);
        handle_key(&mut state, &key(KeyCode::Esc));
        assert_eq!(state.current_view(), View::Forms);
    }

    #[test]
    fn test_preview_mode_keys() {
        let mut state = State::default();
        press(&mut state, '2');
        press(&mut state, 'p');
        assert!(state.is_preview_open());
        press(&mut state, 'n');
        assert!(state.status().is_some());
        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(!state.is_preview_open());
        assert_eq!(state.current_view(), View::Designer);
    }

    #[test]
    fn test_log_mode() {
        let mut state = State::default();
        press(&mut state, 'L');
        assert!(state.is_debug_mode());
        assert!(press(&mut state, 'q'));
        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(!state.is_debug_mode());
    }
}
