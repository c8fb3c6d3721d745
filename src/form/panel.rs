//! Property panel controls.
//!
//! The panel is driven by the selected field's kind: `property_controls`
//! returns only the controls that apply to it. Each control knows how to
//! display the current value and how to turn user input into an edit of the
//! document. Document-level settings use `SettingsControl` in the same way.

use super::designer::DesignerMode;
use super::document::{FieldInstance, FormDocument, SettingsPatch};
use super::error::FormError;
use super::patch::FieldPatch;
use super::schema::{ColumnKind, FieldConfig, FileType};

/// How a control takes input.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlInput {
    /// Edited through a text input and committed with Enter
    Text,
    /// Flipped on activation
    Toggle,
    /// Performs an action on activation
    Action,
}

/// An edit produced by a property control.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Label(String),
    Patch(FieldPatch),
}

/// A single control of the field-properties tab.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyControl {
    Label,
    Placeholder,
    Required,
    Description,
    MaxLength,
    Rows,
    Unit,
    Currency,
    ShowThousands,
    DateFormat,
    FileType(FileType),
    MaxSize,
    MaxCount,
    Option(usize),
    AddOption,
    MaxRows,
    Column(String),
    AddColumn(ColumnKind),
}

/// Return the controls relevant to a field, in panel order.
///
pub fn property_controls(field: &FieldInstance) -> Vec<PropertyControl> {
    let mut controls = vec![PropertyControl::Label];
    if field.kind().has_placeholder() {
        controls.push(PropertyControl::Placeholder);
    }
    controls.push(PropertyControl::Required);
    controls.push(PropertyControl::Description);

    match &field.config {
        FieldConfig::Text(_) => controls.push(PropertyControl::MaxLength),
        FieldConfig::MultilineText(_) => {
            controls.push(PropertyControl::Rows);
            controls.push(PropertyControl::MaxLength);
        }
        FieldConfig::Number(_) => controls.push(PropertyControl::Unit),
        FieldConfig::Money(_) => {
            controls.push(PropertyControl::Currency);
            controls.push(PropertyControl::ShowThousands);
        }
        FieldConfig::SingleChoice(c) | FieldConfig::MultiChoice(c) | FieldConfig::Dropdown(c) => {
            controls.extend((0..c.options.len()).map(PropertyControl::Option));
            controls.push(PropertyControl::AddOption);
        }
        FieldConfig::Date(_) => controls.push(PropertyControl::DateFormat),
        FieldConfig::FileUpload(_) => {
            controls.extend(FileType::ALL.iter().map(|t| PropertyControl::FileType(*t)));
            controls.push(PropertyControl::MaxSize);
            controls.push(PropertyControl::MaxCount);
        }
        FieldConfig::Signature(_) => {}
        FieldConfig::SubTable(c) => {
            controls.push(PropertyControl::MaxRows);
            controls.extend(c.columns.iter().map(|col| PropertyControl::Column(col.id.clone())));
            controls.extend(ColumnKind::ALL.iter().map(|k| PropertyControl::AddColumn(*k)));
        }
    }
    controls
}

fn parse_number(property: &'static str, text: &str) -> Result<u32, FormError> {
    text.trim().parse::<u32>().map_err(|e| FormError::InvalidValue {
        property,
        message: e.to_string(),
    })
}

fn on_off(value: bool) -> String {
    let mark = if value { "[x]" } else { "[ ]" };
    mark.to_string()
}

impl PropertyControl {
    pub fn label(&self, field: &FieldInstance) -> String {
        match self {
            PropertyControl::Label => "Label".to_string(),
            PropertyControl::Placeholder => "Placeholder".to_string(),
            PropertyControl::Required => "Required".to_string(),
            PropertyControl::Description => "Description".to_string(),
            PropertyControl::MaxLength => "Max length".to_string(),
            PropertyControl::Rows => "Rows".to_string(),
            PropertyControl::Unit => "Unit".to_string(),
            PropertyControl::Currency => "Currency".to_string(),
            PropertyControl::ShowThousands => "Thousands separator".to_string(),
            PropertyControl::DateFormat => "Format".to_string(),
            PropertyControl::FileType(t) => format!("Accept {}", t.label()),
            PropertyControl::MaxSize => "Max size (MB)".to_string(),
            PropertyControl::MaxCount => "Max files".to_string(),
            PropertyControl::Option(i) => format!("Option {}", i + 1),
            PropertyControl::AddOption => "+ Add option".to_string(),
            PropertyControl::MaxRows => "Max rows".to_string(),
            PropertyControl::Column(id) => {
                let kind = field
                    .config
                    .as_sub_table()
                    .and_then(|c| c.columns.iter().find(|col| col.id == *id))
                    .map(|col| col.kind.type_label())
                    .unwrap_or_default();
                format!("Column ({})", kind)
            }
            PropertyControl::AddColumn(kind) => format!("+ Add {} column", kind.type_label()),
        }
    }

    pub fn input(&self) -> ControlInput {
        match self {
            PropertyControl::Required
            | PropertyControl::ShowThousands
            | PropertyControl::DateFormat
            | PropertyControl::FileType(_) => ControlInput::Toggle,
            PropertyControl::AddOption | PropertyControl::AddColumn(_) => ControlInput::Action,
            _ => ControlInput::Text,
        }
    }

    /// Whether the control can be removed from the panel with the delete key.
    ///
    pub fn removable(&self) -> bool {
        matches!(self, PropertyControl::Option(_) | PropertyControl::Column(_))
    }

    /// Return the current value as shown in the panel.
    ///
    pub fn display_value(&self, field: &FieldInstance) -> String {
        let config = &field.config;
        match (self, config) {
            (PropertyControl::Label, _) => field.label.clone(),
            (PropertyControl::Placeholder, _) => config.placeholder().unwrap_or_default().to_string(),
            (PropertyControl::Required, _) => on_off(config.required()),
            (PropertyControl::Description, _) => {
                config.common().description.clone().unwrap_or_default()
            }
            (PropertyControl::MaxLength, FieldConfig::Text(c)) => c.effective_max_length().to_string(),
            (PropertyControl::MaxLength, FieldConfig::MultilineText(c)) => {
                c.effective_max_length().to_string()
            }
            (PropertyControl::Rows, FieldConfig::MultilineText(c)) => c.rows.to_string(),
            (PropertyControl::Unit, FieldConfig::Number(c)) => c.unit.clone(),
            (PropertyControl::Currency, FieldConfig::Money(c)) => c.currency.clone(),
            (PropertyControl::ShowThousands, FieldConfig::Money(c)) => on_off(c.show_thousands),
            (PropertyControl::DateFormat, FieldConfig::Date(c)) => c.format.label().to_string(),
            (PropertyControl::FileType(t), FieldConfig::FileUpload(c)) => on_off(c.accepts(*t)),
            (PropertyControl::MaxSize, FieldConfig::FileUpload(c)) => c.max_size_mb.to_string(),
            (PropertyControl::MaxCount, FieldConfig::FileUpload(c)) => c.max_count.to_string(),
            (PropertyControl::Option(i), _) => config
                .options()
                .and_then(|o| o.get(*i))
                .cloned()
                .unwrap_or_default(),
            (PropertyControl::MaxRows, FieldConfig::SubTable(c)) => c.effective_max_rows().to_string(),
            (PropertyControl::Column(id), FieldConfig::SubTable(c)) => c
                .columns
                .iter()
                .find(|col| col.id == *id)
                .map(|col| col.label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Turn committed text input into an edit.
    ///
    pub fn commit(&self, text: &str) -> Result<FieldEdit, FormError> {
        let patch = match self {
            PropertyControl::Label => return Ok(FieldEdit::Label(text.to_string())),
            PropertyControl::Placeholder => FieldPatch::SetPlaceholder(text.to_string()),
            PropertyControl::Description => FieldPatch::SetDescription(Some(text.to_string())),
            PropertyControl::MaxLength => {
                FieldPatch::SetMaxLength(parse_number("max length", text)?)
            }
            PropertyControl::Rows => {
                let rows = parse_number("rows", text)?;
                FieldPatch::SetRows(u16::try_from(rows).map_err(|e| FormError::InvalidValue {
                    property: "rows",
                    message: e.to_string(),
                })?)
            }
            PropertyControl::Unit => FieldPatch::SetUnit(text.trim().to_string()),
            PropertyControl::Currency => FieldPatch::SetCurrency(text.trim().to_string()),
            PropertyControl::MaxSize => FieldPatch::SetMaxSize(parse_number("max size", text)?),
            PropertyControl::MaxCount => FieldPatch::SetMaxCount(parse_number("max count", text)?),
            PropertyControl::Option(i) => FieldPatch::RenameOption(*i, text.to_string()),
            PropertyControl::MaxRows => FieldPatch::SetMaxRows(parse_number("max rows", text)?),
            PropertyControl::Column(id) => FieldPatch::RenameColumn(id.clone(), text.to_string()),
            _ => {
                return Err(FormError::InvalidValue {
                    property: "control",
                    message: "control does not take text input".to_string(),
                })
            }
        };
        Ok(FieldEdit::Patch(patch))
    }

    /// Return the edit performed when a toggle or action control is activated.
    ///
    pub fn activate(&self, field: &FieldInstance) -> Option<FieldEdit> {
        let patch = match (self, &field.config) {
            (PropertyControl::Required, config) => FieldPatch::SetRequired(!config.required()),
            (PropertyControl::ShowThousands, FieldConfig::Money(c)) => {
                FieldPatch::SetShowThousands(!c.show_thousands)
            }
            (PropertyControl::DateFormat, FieldConfig::Date(c)) => {
                FieldPatch::SetDateFormat(c.format.toggled())
            }
            (PropertyControl::FileType(t), FieldConfig::FileUpload(_)) => FieldPatch::ToggleFileType(*t),
            (PropertyControl::AddOption, _) => FieldPatch::AddOption,
            (PropertyControl::AddColumn(kind), _) => FieldPatch::AddColumn(*kind),
            _ => return None,
        };
        Some(FieldEdit::Patch(patch))
    }

    /// Return the edit that removes an option or column.
    ///
    pub fn remove(&self) -> Option<FieldEdit> {
        match self {
            PropertyControl::Option(i) => Some(FieldEdit::Patch(FieldPatch::RemoveOption(*i))),
            PropertyControl::Column(id) => {
                Some(FieldEdit::Patch(FieldPatch::RemoveColumn(id.clone())))
            }
            _ => None,
        }
    }
}

/// A single control of the document-settings tab.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsControl {
    Title,
    Description,
    Pagination,
    CoverEnabled,
    CoverImage,
    SuccessTitle,
    SuccessDescription,
}

/// Return the settings controls available in a designer mode.
///
pub fn settings_controls(mode: DesignerMode) -> Vec<SettingsControl> {
    match mode {
        DesignerMode::Template => vec![SettingsControl::Title, SettingsControl::Description],
        DesignerMode::Form => vec![
            SettingsControl::Title,
            SettingsControl::Description,
            SettingsControl::Pagination,
            SettingsControl::CoverEnabled,
            SettingsControl::CoverImage,
            SettingsControl::SuccessTitle,
            SettingsControl::SuccessDescription,
        ],
    }
}

/// An edit produced by a settings control.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    Patch(SettingsPatch),
    Pagination(bool),
}

impl SettingsControl {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsControl::Title => "Title",
            SettingsControl::Description => "Description",
            SettingsControl::Pagination => "Pagination",
            SettingsControl::CoverEnabled => "Show cover",
            SettingsControl::CoverImage => "Cover image",
            SettingsControl::SuccessTitle => "Success title",
            SettingsControl::SuccessDescription => "Success message",
        }
    }

    pub fn input(&self) -> ControlInput {
        match self {
            SettingsControl::Pagination | SettingsControl::CoverEnabled => ControlInput::Toggle,
            _ => ControlInput::Text,
        }
    }

    pub fn display_value(&self, document: &FormDocument) -> String {
        match self {
            SettingsControl::Title => document.title.clone(),
            SettingsControl::Description => document.description.clone(),
            SettingsControl::Pagination => on_off(document.pagination_enabled()),
            SettingsControl::CoverEnabled => on_off(document.cover_enabled),
            SettingsControl::CoverImage => document.cover_image_ref.clone().unwrap_or_default(),
            SettingsControl::SuccessTitle => document.success_title.clone(),
            SettingsControl::SuccessDescription => document.success_description.clone(),
        }
    }

    pub fn commit(&self, text: &str) -> Option<SettingsEdit> {
        let patch = match self {
            SettingsControl::Title => SettingsPatch::Title(text.to_string()),
            SettingsControl::Description => SettingsPatch::Description(text.to_string()),
            SettingsControl::CoverImage => SettingsPatch::CoverImage(Some(text.to_string())),
            SettingsControl::SuccessTitle => SettingsPatch::SuccessTitle(text.to_string()),
            SettingsControl::SuccessDescription => {
                SettingsPatch::SuccessDescription(text.to_string())
            }
            SettingsControl::Pagination | SettingsControl::CoverEnabled => return None,
        };
        Some(SettingsEdit::Patch(patch))
    }

    pub fn activate(&self, document: &FormDocument) -> Option<SettingsEdit> {
        match self {
            SettingsControl::Pagination => {
                Some(SettingsEdit::Pagination(!document.pagination_enabled()))
            }
            SettingsControl::CoverEnabled => Some(SettingsEdit::Patch(
                SettingsPatch::CoverEnabled(!document.cover_enabled),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::document::InsertSource;
    use crate::form::schema::FieldKind;

    fn field_of(kind: FieldKind) -> FieldInstance {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let ids = document.insert_field(InsertSource::Kind(kind), 1).unwrap();
        document.field(&ids[0]).unwrap().clone()
    }

    #[test]
    fn test_controls_follow_kind() {
        let choice = property_controls(&field_of(FieldKind::SingleChoice));
        assert!(choice.contains(&PropertyControl::Option(1)));
        assert!(choice.contains(&PropertyControl::AddOption));
        assert!(!choice.contains(&PropertyControl::Placeholder));
        assert!(!choice.contains(&PropertyControl::MaxSize));

        let upload = property_controls(&field_of(FieldKind::FileUpload));
        assert!(upload.contains(&PropertyControl::FileType(FileType::Zip)));
        assert!(upload.contains(&PropertyControl::MaxCount));
        assert!(!upload.iter().any(|c| matches!(c, PropertyControl::Option(_))));

        let table = property_controls(&field_of(FieldKind::SubTable));
        assert!(table.contains(&PropertyControl::MaxRows));
        assert!(table.contains(&PropertyControl::Column("c1".to_string())));
        assert!(!table.contains(&PropertyControl::MaxLength));

        let signature = property_controls(&field_of(FieldKind::Signature));
        assert_eq!(
            signature,
            vec![
                PropertyControl::Label,
                PropertyControl::Required,
                PropertyControl::Description
            ]
        );
    }

    #[test]
    fn test_only_choice_kinds_get_option_editor() {
        for kind in FieldKind::ALL {
            let controls = property_controls(&field_of(kind));
            assert_eq!(controls.contains(&PropertyControl::AddOption), kind.is_choice());
        }
    }

    #[test]
    fn test_commit_parses_numbers() {
        assert_eq!(
            PropertyControl::MaxLength.commit("20").unwrap(),
            FieldEdit::Patch(FieldPatch::SetMaxLength(20))
        );
        assert!(matches!(
            PropertyControl::MaxRows.commit("three"),
            Err(FormError::InvalidValue { property: "max rows", .. })
        ));
        assert!(PropertyControl::Required.commit("x").is_err());
        assert_eq!(
            PropertyControl::Label.commit("申请人").unwrap(),
            FieldEdit::Label("申请人".to_string())
        );
    }

    #[test]
    fn test_activate_toggles() {
        let date = field_of(FieldKind::Date);
        assert_eq!(
            PropertyControl::DateFormat.activate(&date),
            Some(FieldEdit::Patch(FieldPatch::SetDateFormat(
                crate::form::schema::DateFormat::DateTime
            )))
        );
        assert_eq!(PropertyControl::MaxLength.activate(&date), None);
        assert!(PropertyControl::Column("c1".to_string()).remove().is_some());
    }

    #[test]
    fn test_display_values() {
        let text = field_of(FieldKind::Text);
        assert_eq!(PropertyControl::MaxLength.display_value(&text), "100");
        assert_eq!(PropertyControl::Required.display_value(&text), "[ ]");
        let table = field_of(FieldKind::SubTable);
        assert_eq!(
            PropertyControl::Column("c2".to_string()).display_value(&table),
            "数量"
        );
        assert_eq!(PropertyControl::Column("c2".to_string()).label(&table), "Column (数字)");
    }

    #[test]
    fn test_settings_controls_by_mode() {
        assert_eq!(settings_controls(DesignerMode::Template).len(), 2);
        let form = settings_controls(DesignerMode::Form);
        assert!(form.contains(&SettingsControl::Pagination));

        let document = FormDocument::blank(DesignerMode::Form);
        assert_eq!(
            SettingsControl::Pagination.activate(&document),
            Some(SettingsEdit::Pagination(false))
        );
        assert_eq!(SettingsControl::Title.activate(&document), None);
        assert_eq!(
            SettingsControl::SuccessTitle.commit("已提交"),
            Some(SettingsEdit::Patch(SettingsPatch::SuccessTitle("已提交".to_string())))
        );
    }
}
