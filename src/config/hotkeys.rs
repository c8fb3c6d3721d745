//! Hotkey configuration management.
//!
//! This module defines the hotkey system for the console, including action types,
//! hotkey bindings, and default configurations per view and per modal mode.

use crate::state::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Represents all possible actions that can be bound to hotkeys.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    // Shared actions
    NavigateNext,
    NavigatePrev,
    Select,
    Back,
    Quit,
    CycleTheme,
    ToggleLog,
    GoDashboard,
    GoForms,
    GoTemplates,
    GoAnalysis,

    // Form list actions
    OpenDesigner,
    PreviewForm,
    OpenChannels,
    OpenData,
    CreateItem,
    EditItem,
    DeleteItem,

    // Designer actions
    SwitchPaneNext,
    SwitchPanePrev,
    SwitchTabNext,
    SwitchTabPrev,
    MoveUp,
    MoveDown,
    AddRow,
    RemoveRow,
    AddPage,
    DeletePage,
    OpenSettings,
    Save,
    Publish,

    // Preview actions
    OptionNext,
    OptionPrev,
    PreviewAdvance,
    PreviewBack,
    ClearValue,

    // Publish and analysis actions
    ToggleItem,
    ToggleAll,
    CycleFilter,
    NextPage,
    PrevPage,
    CopyLink,
    GenerateReport,

    // Modal actions
    Confirm,
    Cancel,
    Submit,
    CopyLog,
}

/// Represents a key combination (KeyCode + modifiers).
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Hotkey {
    /// A bare key without modifiers.
    ///
    pub fn plain(code: KeyCode) -> Self {
        Hotkey {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn char(c: char) -> Self {
        Hotkey::plain(KeyCode::Char(c))
    }
}

/// Custom serialization for Hotkey.
///
impl Serialize for Hotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Hotkey", 3)?;
        state.serialize_field("code", &KeyCodeSerde::from(self.code))?;
        if let KeyCode::Char(c) = self.code {
            state.serialize_field("char", &c)?;
        }
        state.serialize_field("modifiers", &KeyModifiersSerde::from(self.modifiers))?;
        state.end()
    }
}

/// Custom deserialization for Hotkey.
///
impl<'de> Deserialize<'de> for Hotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct HotkeyHelper {
            code: KeyCodeSerde,
            #[serde(default)]
            char: Option<char>,
            #[serde(default)]
            modifiers: KeyModifiersSerde,
        }

        let helper = HotkeyHelper::deserialize(deserializer)?;
        let code = match helper.code {
            KeyCodeSerde::Char => {
                if let Some(c) = helper.char {
                    KeyCode::Char(c)
                } else {
                    return Err(serde::de::Error::custom(
                        "Char key code requires 'char' field",
                    ));
                }
            }
            KeyCodeSerde::Esc => KeyCode::Esc,
            KeyCodeSerde::Enter => KeyCode::Enter,
            KeyCodeSerde::Backspace => KeyCode::Backspace,
            KeyCodeSerde::Delete => KeyCode::Delete,
            KeyCodeSerde::Tab => KeyCode::Tab,
            KeyCodeSerde::BackTab => KeyCode::BackTab,
            KeyCodeSerde::Up => KeyCode::Up,
            KeyCodeSerde::Down => KeyCode::Down,
            KeyCodeSerde::Left => KeyCode::Left,
            KeyCodeSerde::Right => KeyCode::Right,
        };
        Ok(Hotkey {
            code,
            modifiers: helper.modifiers.into(),
        })
    }
}

/// Helper enum for serializing KeyCode.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
enum KeyCodeSerde {
    Char,
    Esc,
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
}

impl From<KeyCode> for KeyCodeSerde {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(_) => KeyCodeSerde::Char,
            KeyCode::Esc => KeyCodeSerde::Esc,
            KeyCode::Enter => KeyCodeSerde::Enter,
            KeyCode::Backspace => KeyCodeSerde::Backspace,
            KeyCode::Delete => KeyCodeSerde::Delete,
            KeyCode::Tab => KeyCodeSerde::Tab,
            KeyCode::BackTab => KeyCodeSerde::BackTab,
            KeyCode::Up => KeyCodeSerde::Up,
            KeyCode::Down => KeyCodeSerde::Down,
            KeyCode::Left => KeyCodeSerde::Left,
            KeyCode::Right => KeyCodeSerde::Right,
            _ => KeyCodeSerde::Char, // Fallback for unsupported keys
        }
    }
}

/// Helper struct for serializing KeyModifiers.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct KeyModifiersSerde {
    #[serde(default)]
    control: bool,
    #[serde(default)]
    shift: bool,
    #[serde(default)]
    alt: bool,
}

impl From<KeyModifiers> for KeyModifiersSerde {
    fn from(modifiers: KeyModifiers) -> Self {
        KeyModifiersSerde {
            control: modifiers.contains(KeyModifiers::CONTROL),
            shift: modifiers.contains(KeyModifiers::SHIFT),
            alt: modifiers.contains(KeyModifiers::ALT),
        }
    }
}

impl From<KeyModifiersSerde> for KeyModifiers {
    fn from(serde: KeyModifiersSerde) -> Self {
        let mut result = KeyModifiers::empty();
        if serde.control {
            result |= KeyModifiers::CONTROL;
        }
        if serde.shift {
            result |= KeyModifiers::SHIFT;
        }
        if serde.alt {
            result |= KeyModifiers::ALT;
        }
        result
    }
}

type Bindings = HashMap<HotkeyAction, Hotkey>;

/// Maps hotkey actions to their key bindings for every view and modal mode.
///
/// `global` is consulted after the view table, so a view binding shadows a
/// global one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewHotkeys {
    pub global: Bindings,
    pub menu: Bindings,
    pub dashboard: Bindings,
    pub forms: Bindings,
    pub designer: Bindings,
    pub templates: Bindings,
    pub publish: Bindings,
    pub analysis: Bindings,
    pub preview: Bindings,
    pub text_input: Bindings,
    pub confirmation: Bindings,
    pub log: Bindings,
}

impl Default for ViewHotkeys {
    fn default() -> Self {
        default_hotkeys()
    }
}

impl ViewHotkeys {
    /// Overlay `overrides` on these bindings table by table. Actions the
    /// overrides do not mention keep their current key.
    ///
    pub fn merge(&mut self, overrides: ViewHotkeys) {
        let tables = [
            (&mut self.global, overrides.global),
            (&mut self.menu, overrides.menu),
            (&mut self.dashboard, overrides.dashboard),
            (&mut self.forms, overrides.forms),
            (&mut self.designer, overrides.designer),
            (&mut self.templates, overrides.templates),
            (&mut self.publish, overrides.publish),
            (&mut self.analysis, overrides.analysis),
            (&mut self.preview, overrides.preview),
            (&mut self.text_input, overrides.text_input),
            (&mut self.confirmation, overrides.confirmation),
            (&mut self.log, overrides.log),
        ];
        for (table, extra) in tables {
            table.extend(extra);
        }
    }
}

fn bindings(entries: &[(HotkeyAction, Hotkey)]) -> Bindings {
    entries.iter().cloned().collect()
}

/// Returns default hotkey mappings for all views.
///
pub fn default_hotkeys() -> ViewHotkeys {
    use HotkeyAction::*;

    let global = bindings(&[
        (Quit, Hotkey::char('q')),
        (CycleTheme, Hotkey::char('t')),
        (ToggleLog, Hotkey::char('L')),
        (GoDashboard, Hotkey::char('1')),
        (GoForms, Hotkey::char('2')),
        (GoTemplates, Hotkey::char('3')),
        (GoAnalysis, Hotkey::char('4')),
    ]);

    let menu = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (Select, Hotkey::plain(KeyCode::Enter)),
    ]);

    let dashboard = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let forms = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (OpenDesigner, Hotkey::plain(KeyCode::Enter)),
        (EditItem, Hotkey::char('e')),
        (PreviewForm, Hotkey::char('p')),
        (OpenChannels, Hotkey::char('c')),
        (OpenData, Hotkey::char('v')),
        (CreateItem, Hotkey::char('n')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let designer = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (Select, Hotkey::plain(KeyCode::Enter)),
        (SwitchPaneNext, Hotkey::plain(KeyCode::Tab)),
        (SwitchPanePrev, Hotkey::plain(KeyCode::BackTab)),
        (SwitchTabNext, Hotkey::char('l')),
        (SwitchTabPrev, Hotkey::char('h')),
        (MoveDown, Hotkey::char('J')),
        (MoveUp, Hotkey::char('K')),
        (DeleteItem, Hotkey::char('d')),
        (AddRow, Hotkey::char('+')),
        (RemoveRow, Hotkey::char('-')),
        (AddPage, Hotkey::char('a')),
        (DeletePage, Hotkey::char('x')),
        (OpenSettings, Hotkey::char('o')),
        (PreviewForm, Hotkey::char('p')),
        (Save, Hotkey::char('s')),
        (Publish, Hotkey::char('P')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let templates = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (SwitchTabNext, Hotkey::char('l')),
        (SwitchTabPrev, Hotkey::char('h')),
        (Select, Hotkey::plain(KeyCode::Enter)),
        (CreateItem, Hotkey::char('n')),
        (EditItem, Hotkey::char('e')),
        (DeleteItem, Hotkey::char('d')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let publish = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (ToggleItem, Hotkey::char(' ')),
        (CreateItem, Hotkey::char('n')),
        (DeleteItem, Hotkey::char('d')),
        (CopyLink, Hotkey::char('y')),
        (OpenData, Hotkey::char('v')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let analysis = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (ToggleItem, Hotkey::char(' ')),
        (ToggleAll, Hotkey::char('a')),
        (CycleFilter, Hotkey::char('f')),
        (NextPage, Hotkey::char(']')),
        (PrevPage, Hotkey::char('[')),
        (DeleteItem, Hotkey::char('d')),
        (GenerateReport, Hotkey::char('r')),
        (Back, Hotkey::plain(KeyCode::Esc)),
    ]);

    let preview = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (OptionNext, Hotkey::char('l')),
        (OptionPrev, Hotkey::char('h')),
        (Select, Hotkey::plain(KeyCode::Enter)),
        (RemoveRow, Hotkey::char('-')),
        (ClearValue, Hotkey::char('x')),
        (PreviewAdvance, Hotkey::char('n')),
        (PreviewBack, Hotkey::char('b')),
        (Cancel, Hotkey::plain(KeyCode::Esc)),
    ]);

    let text_input = bindings(&[
        (Submit, Hotkey::plain(KeyCode::Enter)),
        (Cancel, Hotkey::plain(KeyCode::Esc)),
    ]);

    let confirmation = bindings(&[
        (Confirm, Hotkey::plain(KeyCode::Enter)),
        (Cancel, Hotkey::plain(KeyCode::Esc)),
    ]);

    let log = bindings(&[
        (NavigateNext, Hotkey::char('j')),
        (NavigatePrev, Hotkey::char('k')),
        (CopyLog, Hotkey::char('y')),
        (ToggleLog, Hotkey::char('L')),
        (Cancel, Hotkey::plain(KeyCode::Esc)),
    ]);

    ViewHotkeys {
        global,
        menu,
        dashboard,
        forms,
        designer,
        templates,
        publish,
        analysis,
        preview,
        text_input,
        confirmation,
        log,
    }
}

/// Checks if a KeyEvent matches a Hotkey.
///
/// For character keys the case of the character already carries Shift, so
/// Shift is ignored on both sides.
pub fn matches_hotkey(event: &KeyEvent, hotkey: &Hotkey) -> bool {
    if event.code != hotkey.code {
        return false;
    }
    match event.code {
        KeyCode::Char(_) => {
            event.modifiers.difference(KeyModifiers::SHIFT)
                == hotkey.modifiers.difference(KeyModifiers::SHIFT)
        }
        _ => event.modifiers == hotkey.modifiers,
    }
}

fn find_action(bindings: &Bindings, event: &KeyEvent) -> Option<HotkeyAction> {
    bindings
        .iter()
        .find(|(_, hotkey)| matches_hotkey(event, hotkey))
        .map(|(action, _)| *action)
}

/// Returns the binding table of a view.
///
pub fn bindings_for_view<'a>(view: &View, hotkeys: &'a ViewHotkeys) -> &'a Bindings {
    match view {
        View::Dashboard => &hotkeys.dashboard,
        View::Forms => &hotkeys.forms,
        View::Designer => &hotkeys.designer,
        View::Templates => &hotkeys.templates,
        View::Publish => &hotkeys.publish,
        View::Analysis => &hotkeys.analysis,
    }
}

/// Gets the action for a KeyEvent in a specific view, falling back to the
/// global bindings.
///
pub fn get_action_for_event(
    event: &KeyEvent,
    view: &View,
    hotkeys: &ViewHotkeys,
) -> Option<HotkeyAction> {
    find_action(bindings_for_view(view, hotkeys), event)
        .or_else(|| find_action(&hotkeys.global, event))
}

/// Represents special modes that have their own hotkey configurations.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMode {
    Menu,
    Preview,
    TextInput,
    Confirmation,
    Log,
}

/// Returns the binding table of a special mode.
///
pub fn bindings_for_mode(mode: SpecialMode, hotkeys: &ViewHotkeys) -> &Bindings {
    match mode {
        SpecialMode::Menu => &hotkeys.menu,
        SpecialMode::Preview => &hotkeys.preview,
        SpecialMode::TextInput => &hotkeys.text_input,
        SpecialMode::Confirmation => &hotkeys.confirmation,
        SpecialMode::Log => &hotkeys.log,
    }
}

/// Gets the action for a KeyEvent in a special mode. Only the sidebar menu
/// falls back to the global bindings; modals capture every key.
///
pub fn get_action_for_special_mode(
    event: &KeyEvent,
    mode: SpecialMode,
    hotkeys: &ViewHotkeys,
) -> Option<HotkeyAction> {
    let action = find_action(bindings_for_mode(mode, hotkeys), event);
    match mode {
        SpecialMode::Menu => action.or_else(|| find_action(&hotkeys.global, event)),
        _ => action,
    }
}

/// Builds a footer text string from hotkey configurations.
/// Takes a list of tuples: (action, description, optional_second_action_for_paired_keys)
///
pub fn build_footer_text(
    hotkeys: &Bindings,
    actions: &[(HotkeyAction, &str, Option<HotkeyAction>)],
) -> String {
    let mut parts = Vec::new();

    for (action, description, paired_action) in actions {
        if let Some(hotkey) = hotkeys.get(action) {
            match paired_action.and_then(|paired| hotkeys.get(&paired)) {
                Some(paired_hotkey) => parts.push(format!(
                    " {}/{}: {}",
                    format_hotkey_display(hotkey),
                    format_hotkey_display(paired_hotkey),
                    description
                )),
                None => parts.push(format!(
                    " {}: {}",
                    format_hotkey_display(hotkey),
                    description
                )),
            }
        }
    }

    parts.join(",")
}

/// Formats a hotkey for display in the footer.
///
pub fn format_hotkey_display(hotkey: &Hotkey) -> String {
    let mut parts = Vec::new();
    if hotkey.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if hotkey.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    if hotkey.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }

    let key_str = match &hotkey.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        _ => "Unknown".to_string(),
    };

    if parts.is_empty() {
        key_str
    } else {
        format!("{}+{}", parts.join("+"), key_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_matches_hotkey() {
        let hotkey = Hotkey::char('j');
        assert!(matches_hotkey(
            &key(KeyCode::Char('j'), KeyModifiers::empty()),
            &hotkey
        ));
        assert!(!matches_hotkey(
            &key(KeyCode::Char('k'), KeyModifiers::empty()),
            &hotkey
        ));
        assert!(!matches_hotkey(
            &key(KeyCode::Char('j'), KeyModifiers::CONTROL),
            &hotkey
        ));
    }

    #[test]
    fn test_shift_is_implied_by_char_case() {
        let hotkey = Hotkey::char('P');
        assert!(matches_hotkey(
            &key(KeyCode::Char('P'), KeyModifiers::SHIFT),
            &hotkey
        ));
        assert!(matches_hotkey(
            &key(KeyCode::Char('P'), KeyModifiers::empty()),
            &hotkey
        ));
        let tab = Hotkey::plain(KeyCode::Tab);
        assert!(!matches_hotkey(&key(KeyCode::Tab, KeyModifiers::SHIFT), &tab));
    }

    #[test]
    fn test_get_action_for_event() {
        let hotkeys = default_hotkeys();
        let j = key(KeyCode::Char('j'), KeyModifiers::empty());
        assert_eq!(
            get_action_for_event(&j, &View::Designer, &hotkeys),
            Some(HotkeyAction::NavigateNext)
        );

        let s = key(KeyCode::Char('s'), KeyModifiers::empty());
        assert_eq!(
            get_action_for_event(&s, &View::Designer, &hotkeys),
            Some(HotkeyAction::Save)
        );
        assert_eq!(get_action_for_event(&s, &View::Dashboard, &hotkeys), None);

        // falls back to the global table
        let q = key(KeyCode::Char('q'), KeyModifiers::empty());
        assert_eq!(
            get_action_for_event(&q, &View::Publish, &hotkeys),
            Some(HotkeyAction::Quit)
        );
    }

    #[test]
    fn test_special_modes_capture_keys() {
        let hotkeys = default_hotkeys();
        let q = key(KeyCode::Char('q'), KeyModifiers::empty());
        assert_eq!(
            get_action_for_special_mode(&q, SpecialMode::TextInput, &hotkeys),
            None
        );
        assert_eq!(
            get_action_for_special_mode(&q, SpecialMode::Menu, &hotkeys),
            Some(HotkeyAction::Quit)
        );
        let enter = key(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(
            get_action_for_special_mode(&enter, SpecialMode::Confirmation, &hotkeys),
            Some(HotkeyAction::Confirm)
        );
    }

    #[test]
    fn test_default_hotkeys() {
        let hotkeys = default_hotkeys();
        assert!(!hotkeys.global.is_empty());
        assert!(!hotkeys.forms.is_empty());
        assert!(!hotkeys.designer.is_empty());
        assert!(!hotkeys.preview.is_empty());
        assert_eq!(hotkeys.confirmation.len(), 2);
    }

    #[test]
    fn test_build_footer_text() {
        let hotkeys = default_hotkeys();
        let text = build_footer_text(
            &hotkeys.designer,
            &[
                (
                    HotkeyAction::NavigateNext,
                    "navigate",
                    Some(HotkeyAction::NavigatePrev),
                ),
                (HotkeyAction::SwitchPaneNext, "pane", None),
                (HotkeyAction::ToggleAll, "unbound", None),
            ],
        );
        assert_eq!(text, " j/k: navigate, Tab: pane");
        assert_eq!(format_hotkey_display(&Hotkey::char(' ')), "Space");
    }

    #[test]
    fn test_hotkey_serialization() {
        let hotkey = Hotkey::char('j');
        let serialized = serde_yaml::to_string(&hotkey).unwrap();
        assert!(serialized.contains("j"));
        let deserialized: Hotkey = serde_yaml::from_str(&serialized).unwrap();
        assert_eq!(hotkey, deserialized);

        let tab = Hotkey::plain(KeyCode::BackTab);
        let yaml = serde_yaml::to_string(&tab).unwrap();
        let back: Hotkey = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, tab);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let yaml = "forms:\n  create_item:\n    code: Char\n    char: 'N'\n";
        let overrides: ViewHotkeys = serde_yaml::from_str(yaml).unwrap();
        let mut hotkeys = default_hotkeys();
        hotkeys.merge(overrides);
        assert_eq!(
            hotkeys.forms.get(&HotkeyAction::CreateItem),
            Some(&Hotkey::char('N'))
        );
        assert_eq!(
            hotkeys.forms.get(&HotkeyAction::OpenData),
            Some(&Hotkey::char('v'))
        );
        assert!(!hotkeys.designer.is_empty());
    }
}
