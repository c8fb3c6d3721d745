//! Values entered while filling a form in the preview, and their validation.

use super::document::{FieldId, FieldInstance, FormDocument, PageId};
use super::schema::FieldConfig;
use super::subtable::{RowAppend, SubTableRows};
use crate::utils::validation;
use std::collections::HashMap;

/// A value entered for one field.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillValue {
    Text(String),
    Choice(usize),
    Choices(Vec<usize>),
    Files(u32),
    Signed(bool),
}

/// A validation failure reported for a field.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillIssue {
    pub field: FieldId,
    pub page: PageId,
    pub message: String,
}

/// Holds everything entered during one preview session.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillState {
    values: HashMap<FieldId, FillValue>,
    rows: HashMap<FieldId, SubTableRows>,
}

impl FillState {
    pub fn new() -> Self {
        FillState::default()
    }

    pub fn value(&self, field: &FieldId) -> Option<&FillValue> {
        self.values.get(field)
    }

    /// Return the text entered for a field, empty when nothing was entered.
    ///
    pub fn text(&self, field: &FieldId) -> &str {
        match self.values.get(field) {
            Some(FillValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn set_text(&mut self, field: &FieldId, text: String) {
        self.values.insert(field.clone(), FillValue::Text(text));
    }

    /// Select a single option, or clear it when it is already selected.
    ///
    pub fn select_option(&mut self, field: &FieldId, index: usize) {
        if self.values.get(field) == Some(&FillValue::Choice(index)) {
            self.values.remove(field);
        } else {
            self.values.insert(field.clone(), FillValue::Choice(index));
        }
    }

    /// Toggle one option of a multi-choice field.
    ///
    pub fn toggle_option(&mut self, field: &FieldId, index: usize) {
        let entry = self
            .values
            .entry(field.clone())
            .or_insert_with(|| FillValue::Choices(vec![]));
        if let FillValue::Choices(selected) = entry {
            match selected.iter().position(|i| *i == index) {
                Some(pos) => {
                    selected.remove(pos);
                }
                None => {
                    selected.push(index);
                    selected.sort_unstable();
                }
            }
        } else {
            *entry = FillValue::Choices(vec![index]);
        }
    }

    /// Attach one more file unless the count limit is reached.
    ///
    pub fn add_file(&mut self, field: &FieldId, max_count: u32) -> bool {
        let count = self.file_count(field);
        if count >= max_count {
            return false;
        }
        self.values.insert(field.clone(), FillValue::Files(count + 1));
        true
    }

    pub fn clear_files(&mut self, field: &FieldId) {
        self.values.remove(field);
    }

    pub fn file_count(&self, field: &FieldId) -> u32 {
        match self.values.get(field) {
            Some(FillValue::Files(count)) => *count,
            _ => 0,
        }
    }

    pub fn toggle_signed(&mut self, field: &FieldId) {
        let signed = self.is_signed(field);
        self.values.insert(field.clone(), FillValue::Signed(!signed));
    }

    pub fn is_signed(&self, field: &FieldId) -> bool {
        matches!(self.values.get(field), Some(FillValue::Signed(true)))
    }

    pub fn rows(&self, field: &FieldId) -> Option<&SubTableRows> {
        self.rows.get(field)
    }

    pub fn add_row(&mut self, field: &FieldId, max_rows: u32) -> RowAppend {
        self.rows.entry(field.clone()).or_default().add_row(max_rows)
    }

    pub fn remove_last_row(&mut self, field: &FieldId) -> bool {
        self.rows
            .entry(field.clone())
            .or_default()
            .remove_last()
            .is_some()
    }

    /// Validate every field of the document against the entered values, in
    /// document order.
    ///
    pub fn validate(&self, document: &FormDocument) -> Vec<FillIssue> {
        document
            .fields()
            .iter()
            .filter_map(|field| {
                self.check_field(field).map(|message| FillIssue {
                    field: field.id.clone(),
                    page: field.page_id,
                    message,
                })
            })
            .collect()
    }

    fn check_field(&self, field: &FieldInstance) -> Option<String> {
        let id = &field.id;
        let text = self.text(id).trim();
        let required = field.config.required();
        let missing = match &field.config {
            FieldConfig::SingleChoice(_) | FieldConfig::Dropdown(_) => {
                !matches!(self.value(id), Some(FillValue::Choice(_)))
            }
            FieldConfig::MultiChoice(_) => match self.value(id) {
                Some(FillValue::Choices(selected)) => selected.is_empty(),
                _ => true,
            },
            FieldConfig::FileUpload(_) => self.file_count(id) == 0,
            FieldConfig::Signature(_) => !self.is_signed(id),
            FieldConfig::SubTable(_) => self.rows(id).map(|r| r.is_empty()).unwrap_or(false),
            _ => text.is_empty(),
        };
        if missing {
            return if required {
                Some("此项为必填项".to_string())
            } else {
                None
            };
        }

        match &field.config {
            FieldConfig::Text(c) => {
                let max = c.effective_max_length();
                (validation::char_count(text) > max).then(|| format!("最多输入{}个字", max))
            }
            FieldConfig::MultilineText(c) => {
                let max = c.effective_max_length();
                (validation::char_count(text) > max).then(|| format!("最多输入{}个字", max))
            }
            FieldConfig::Number(_) => {
                (!validation::is_number(text)).then(|| "请输入有效数字".to_string())
            }
            FieldConfig::Money(c) => {
                (!validation::is_money(text, &c.currency)).then(|| "请输入有效金额".to_string())
            }
            FieldConfig::Date(c) => (!validation::is_date(text, c.format))
                .then(|| format!("日期格式应为 {}", c.format.hint())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::designer::DesignerMode;
    use crate::form::document::InsertSource;
    use crate::form::patch::FieldPatch;
    use crate::form::schema::FieldKind;

    fn insert(document: &mut FormDocument, kind: FieldKind, page: PageId) -> FieldId {
        document.insert_field(InsertSource::Kind(kind), page).unwrap()[0].clone()
    }

    #[test]
    fn test_required_fields_reported() {
        let document = FormDocument::blank(DesignerMode::Form);
        let state = FillState::new();
        let issues = state.validate(&document);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "此项为必填项");
        assert_eq!(issues[0].page, 1);
    }

    #[test]
    fn test_optional_empty_fields_pass() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        for kind in FieldKind::ALL {
            if kind != FieldKind::Signature {
                insert(&mut document, kind, 1);
            }
        }
        assert!(FillState::new().validate(&document).is_empty());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let document = FormDocument::blank(DesignerMode::Form);
        let id = document.fields()[0].id.clone();
        let mut state = FillState::new();
        state.set_text(&id, "张".repeat(20));
        assert!(state.validate(&document).is_empty());
        state.set_text(&id, "张".repeat(21));
        assert_eq!(state.validate(&document)[0].message, "最多输入20个字");
    }

    #[test]
    fn test_format_checks() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let number = insert(&mut document, FieldKind::Number, 1);
        let money = insert(&mut document, FieldKind::Money, 1);
        let date = insert(&mut document, FieldKind::Date, 1);

        let mut state = FillState::new();
        state.set_text(&number, "abc".to_string());
        state.set_text(&money, "¥3,000.00".to_string());
        state.set_text(&date, "2023/10/24".to_string());
        let issues = state.validate(&document);
        let flagged: Vec<&FieldId> = issues.iter().map(|i| &i.field).collect();
        assert_eq!(flagged, vec![&number, &date]);

        document
            .update_field_config(&date, FieldPatch::SetDateFormat(crate::form::schema::DateFormat::DateTime))
            .unwrap();
        state.set_text(&number, "12".to_string());
        state.set_text(&date, "2023-10-24 09:00".to_string());
        assert!(state.validate(&document).is_empty());
    }

    #[test]
    fn test_choice_values() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let multi = insert(&mut document, FieldKind::MultiChoice, 1);
        document
            .update_field_config(&multi, FieldPatch::SetRequired(true))
            .unwrap();

        let mut state = FillState::new();
        state.toggle_option(&multi, 2);
        state.toggle_option(&multi, 0);
        assert_eq!(state.value(&multi), Some(&FillValue::Choices(vec![0, 2])));
        assert!(state.validate(&document).is_empty());
        state.toggle_option(&multi, 0);
        state.toggle_option(&multi, 2);
        assert_eq!(state.validate(&document).len(), 1);

        let single = FieldId::from("single");
        state.select_option(&single, 1);
        assert_eq!(state.value(&single), Some(&FillValue::Choice(1)));
        state.select_option(&single, 1);
        assert_eq!(state.value(&single), None);
    }

    #[test]
    fn test_files_and_signature() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let signature = insert(&mut document, FieldKind::Signature, 1);
        let upload = insert(&mut document, FieldKind::FileUpload, 1);

        let mut state = FillState::new();
        assert!(state.add_file(&upload, 2));
        assert!(state.add_file(&upload, 2));
        assert!(!state.add_file(&upload, 2));
        assert_eq!(state.file_count(&upload), 2);

        assert_eq!(state.validate(&document).len(), 1);
        state.toggle_signed(&signature);
        assert!(state.validate(&document).is_empty());
    }

    #[test]
    fn test_required_sub_table_needs_a_row() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let table = insert(&mut document, FieldKind::SubTable, 1);
        document
            .update_field_config(&table, FieldPatch::SetRequired(true))
            .unwrap();
        let mut state = FillState::new();
        assert!(state.validate(&document).is_empty());
        assert!(state.remove_last_row(&table));
        assert!(!state.remove_last_row(&table));
        assert_eq!(state.validate(&document).len(), 1);
        assert!(matches!(state.add_row(&table, 10), RowAppend::Added(_)));
        assert!(state.validate(&document).is_empty());
    }
}
