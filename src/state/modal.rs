//! Modal state types.
//!
//! Pending confirmations, the single-line text editor used by every text
//! property, and the transient status line.

use crate::form::panel::{PropertyControl, SettingsControl};
use crate::form::{FieldId, PageId};
use tui_textarea::{CursorMove, TextArea};

/// Destructive action waiting for the user's confirmation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    DeleteField { id: FieldId, label: String },
    DeletePage { page: PageId, position: usize, field_count: usize },
    DeleteChannel { id: String, name: String },
    DeleteTemplate { id: String, title: String },
    DeleteSubmissions(Vec<String>),
}

impl Confirmation {
    pub fn title(&self) -> &'static str {
        match self {
            Confirmation::DeleteField { .. } => "Delete field",
            Confirmation::DeletePage { .. } => "Delete page",
            Confirmation::DeleteChannel { .. } => "Delete channel",
            Confirmation::DeleteTemplate { .. } => "Delete template",
            Confirmation::DeleteSubmissions(_) => "Delete submissions",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Confirmation::DeleteField { label, .. } => format!("Delete field \"{}\"?", label),
            Confirmation::DeletePage {
                position,
                field_count,
                ..
            } => format!(
                "Delete page {} and the {} field(s) on it?",
                position, field_count
            ),
            Confirmation::DeleteChannel { name, .. } => format!("Delete channel \"{}\"?", name),
            Confirmation::DeleteTemplate { title, .. } => {
                format!("Delete template \"{}\"?", title)
            }
            Confirmation::DeleteSubmissions(ids) => {
                format!("Delete {} selected submission(s)?", ids.len())
            }
        }
    }
}

/// What a committed text input is applied to.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    Property(PropertyControl),
    Setting(SettingsControl),
    ChannelName,
    PreviewText(FieldId),
}

/// Text editor shown as a popup.
///
pub struct TextInput {
    pub target: InputTarget,
    pub title: String,
    textarea: TextArea<'static>,
}

impl TextInput {
    pub fn new(target: InputTarget, title: String, initial: &str) -> Self {
        let mut textarea = TextArea::from(vec![initial.to_string()]);
        textarea.move_cursor(CursorMove::End);
        TextInput {
            target,
            title,
            textarea,
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Cursor column in characters.
    ///
    pub fn cursor(&self) -> usize {
        self.textarea.cursor().1
    }

    pub fn insert_char(&mut self, c: char) {
        self.textarea.insert_char(c);
    }

    pub fn delete_char(&mut self) {
        self.textarea.delete_char();
    }

    pub fn delete_next_char(&mut self) {
        self.textarea.delete_next_char();
    }

    pub fn move_left(&mut self) {
        self.textarea.move_cursor(CursorMove::Back);
    }

    pub fn move_right(&mut self) {
        self.textarea.move_cursor(CursorMove::Forward);
    }

    pub fn move_home(&mut self) {
        self.textarea.move_cursor(CursorMove::Head);
    }

    pub fn move_end(&mut self) {
        self.textarea.move_cursor(CursorMove::End);
    }
}

impl std::fmt::Debug for TextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInput")
            .field("target", &self.target)
            .field("title", &self.title)
            .field("text", &self.text())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Ticks a status message stays on screen.
const STATUS_TICKS: u16 = 80;

/// One-line feedback shown in the footer until it expires.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    ticks_left: u16,
}

impl StatusMessage {
    pub fn new(text: String, level: StatusLevel) -> Self {
        StatusMessage {
            text,
            level,
            ticks_left: STATUS_TICKS,
        }
    }

    /// Count down one tick. Returns false once expired.
    ///
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_messages() {
        let page = Confirmation::DeletePage {
            page: 3,
            position: 2,
            field_count: 4,
        };
        assert_eq!(page.title(), "Delete page");
        assert!(page.message().contains("page 2"));
        assert!(page.message().contains("4 field"));

        let rows = Confirmation::DeleteSubmissions(vec!["a".to_string(), "b".to_string()]);
        assert!(rows.message().contains("2 selected"));
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::new(InputTarget::ChannelName, "Channel".to_string(), "海报");
        assert_eq!(input.cursor(), 2);
        input.insert_char('A');
        assert_eq!(input.text(), "海报A");
        input.move_home();
        input.delete_next_char();
        assert_eq!(input.text(), "报A");
        input.move_end();
        input.delete_char();
        assert_eq!(input.text(), "报");
    }

    #[test]
    fn test_status_expires() {
        let mut status = StatusMessage::new("Saved".to_string(), StatusLevel::Info);
        let mut ticks = 0;
        while status.tick() {
            ticks += 1;
        }
        assert_eq!(ticks, STATUS_TICKS - 1);
    }
}
