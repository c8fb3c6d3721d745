//! Form document model.
//!
//! A `FormDocument` is the in-memory representation of the form being
//! designed: ordered pages, ordered field instances and presentation settings.
//! Every mutating operation either succeeds completely or returns a
//! `FormError` and leaves the document unchanged, so the two structural
//! invariants always hold:
//!
//! - `pages` is never empty
//! - every field references a live page

use super::designer::DesignerMode;
use super::error::FormError;
use super::library::LibraryItem;
use super::patch::FieldPatch;
use super::schema::{CommonProps, FieldConfig, FieldKind, TextConfig};
use super::template::{ComponentTemplate, TemplateField};
use crate::services::forms::FormItem;
use log::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub type PageId = u32;

/// Stable identifier of a placed field.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        FieldId(id.to_string())
    }
}

/// A concrete field placed on a page, owning its own configuration copy.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInstance {
    pub id: FieldId,
    pub label: String,
    pub page_id: PageId,
    pub config: FieldConfig,
}

impl FieldInstance {
    pub fn kind(&self) -> FieldKind {
        self.config.kind()
    }
}

/// Where inserted fields come from. Configuration is always cloned out of
/// the source.
///
#[derive(Debug, Clone, Copy)]
pub enum InsertSource<'a> {
    Kind(FieldKind),
    Library(&'a LibraryItem),
    Template(&'a ComponentTemplate),
}

/// Direction of a reorder step within a page.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Edits of the document-level presentation settings.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsPatch {
    Title(String),
    Description(String),
    CoverEnabled(bool),
    CoverImage(Option<String>),
    SuccessTitle(String),
    SuccessDescription(String),
}

/// Houses one form being designed.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDocument {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub cover_enabled: bool,
    pub cover_image_ref: Option<String>,
    pub success_title: String,
    pub success_description: String,
    pagination_enabled: bool,
    pages: Vec<PageId>,
    fields: Vec<FieldInstance>,
    #[serde(skip)]
    next_seq: u64,
}

impl FormDocument {
    /// Return an empty single-page document with default presentation settings.
    ///
    pub fn empty(mode: DesignerMode) -> Self {
        let is_form = mode == DesignerMode::Form;
        FormDocument {
            id: None,
            title: match mode {
                DesignerMode::Form => "未命名表单".to_string(),
                DesignerMode::Template => "新建模版".to_string(),
            },
            description: "请如实填写以下信息，以便我们进行审核。".to_string(),
            cover_enabled: is_form,
            cover_image_ref: None,
            success_title: "提交成功".to_string(),
            success_description: "您的申请已收到，我们将尽快进行审核。".to_string(),
            pagination_enabled: is_form,
            pages: vec![1],
            fields: vec![],
            next_seq: 1,
        }
    }

    /// Return a fresh document holding the starter applicant-name field.
    ///
    pub fn blank(mode: DesignerMode) -> Self {
        let mut document = FormDocument::empty(mode);
        let id = document.next_field_id();
        document.fields.push(FieldInstance {
            id,
            label: "申请人姓名".to_string(),
            page_id: 1,
            config: FieldConfig::Text(TextConfig {
                common: CommonProps {
                    placeholder: Some("请输入真实姓名".to_string()),
                    required: true,
                    description: None,
                },
                max_length: Some(20),
            }),
        });
        document
    }

    /// Hydrate a document from an existing form entry.
    ///
    pub fn from_form_item(item: &FormItem) -> Self {
        let mut document = FormDocument::blank(DesignerMode::Form);
        document.id = Some(item.id.clone());
        document.title = item.title.clone();
        document
    }

    /// Hydrate a document from a template: its fields land on the first page.
    ///
    pub fn from_template(template: &ComponentTemplate, mode: DesignerMode) -> Self {
        let mut document = FormDocument::empty(mode);
        document.title = template.title.clone();
        document.description = template.description.clone();
        for field in &template.fields {
            let id = document.next_field_id();
            document.fields.push(FieldInstance {
                id,
                label: field.label.clone(),
                page_id: 1,
                config: field.default_config.clone(),
            });
        }
        document
    }

    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    pub fn fields(&self) -> &[FieldInstance] {
        &self.fields
    }

    pub fn pagination_enabled(&self) -> bool {
        self.pagination_enabled
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldInstance> {
        self.fields.iter().find(|f| f.id == *id)
    }

    pub fn has_page(&self, page: PageId) -> bool {
        self.pages.contains(&page)
    }

    /// Return the zero-based position of a page.
    ///
    pub fn page_index(&self, page: PageId) -> Option<usize> {
        self.pages.iter().position(|p| *p == page)
    }

    pub fn fields_on_page(&self, page: PageId) -> impl Iterator<Item = &FieldInstance> {
        self.fields.iter().filter(move |f| f.page_id == page)
    }

    /// Return the fields shown for a page: the page's own fields when
    /// pagination is on, every field otherwise.
    ///
    pub fn visible_fields(&self, page: PageId) -> Vec<&FieldInstance> {
        if self.pagination_enabled {
            self.fields_on_page(page).collect()
        } else {
            self.fields.iter().collect()
        }
    }

    fn next_field_id(&mut self) -> FieldId {
        loop {
            let id = FieldId(format!("field_{}", self.next_seq));
            self.next_seq += 1;
            if self.field(&id).is_none() {
                return id;
            }
        }
    }

    fn field_index(&self, id: &FieldId) -> Result<usize, FormError> {
        self.fields
            .iter()
            .position(|f| f.id == *id)
            .ok_or_else(|| FormError::FieldNotFound(id.to_string()))
    }

    /// Insert a library item, bare kind or template bundle at the end of a
    /// page. Returns the ids of the new fields in insertion order.
    ///
    pub fn insert_field(
        &mut self,
        source: InsertSource<'_>,
        page: PageId,
    ) -> Result<Vec<FieldId>, FormError> {
        if !self.has_page(page) {
            return Err(FormError::PageNotFound(page));
        }
        let entries: Vec<(String, FieldConfig)> = match source {
            InsertSource::Kind(kind) => {
                vec![(kind.display_name().to_string(), kind.default_config())]
            }
            InsertSource::Library(item) => {
                vec![(item.label.clone(), item.default_config.clone())]
            }
            InsertSource::Template(template) => template
                .fields
                .iter()
                .map(|f| (f.label.clone(), f.default_config.clone()))
                .collect(),
        };

        let mut ids = Vec::with_capacity(entries.len());
        for (label, config) in entries {
            let id = self.next_field_id();
            debug!("Inserting {} field {} on page {}", config.kind(), id, page);
            self.fields.push(FieldInstance {
                id: id.clone(),
                label,
                page_id: page,
                config,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    /// Remove a field and return it.
    ///
    pub fn delete_field(&mut self, id: &FieldId) -> Result<FieldInstance, FormError> {
        let index = self.field_index(id)?;
        debug!("Deleting field {}", id);
        Ok(self.fields.remove(index))
    }

    /// Apply a property edit to a field's configuration.
    ///
    pub fn update_field_config(&mut self, id: &FieldId, patch: FieldPatch) -> Result<(), FormError> {
        let index = self.field_index(id)?;
        let mut seq = self.next_seq;
        let field = &mut self.fields[index];
        // Columns hydrated from a template keep their ids; skip those.
        let taken: Vec<String> = field
            .config
            .as_sub_table()
            .map(|table| table.columns.iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default();
        field.config.apply(patch, || loop {
            let column_id = format!("col_{}", seq);
            seq += 1;
            if !taken.contains(&column_id) {
                break column_id;
            }
        })?;
        self.next_seq = seq;
        Ok(())
    }

    /// Replace a field's configuration wholesale. The replacement must be of
    /// the field's kind.
    ///
    pub fn replace_field_config(&mut self, id: &FieldId, config: FieldConfig) -> Result<(), FormError> {
        let index = self.field_index(id)?;
        let field = &mut self.fields[index];
        if field.kind() != config.kind() {
            return Err(FormError::KindMismatch {
                expected: field.kind(),
                found: config.kind(),
            });
        }
        field.config = config;
        Ok(())
    }

    pub fn update_field_label(&mut self, id: &FieldId, label: String) -> Result<(), FormError> {
        let index = self.field_index(id)?;
        self.fields[index].label = label;
        Ok(())
    }

    /// Swap a field with its nearest neighbour on the same page. Returns false
    /// when the field is already at the edge of its page.
    ///
    pub fn move_field(&mut self, id: &FieldId, direction: MoveDirection) -> Result<bool, FormError> {
        let index = self.field_index(id)?;
        let page = self.fields[index].page_id;
        let neighbour = match direction {
            MoveDirection::Up => self.fields[..index].iter().rposition(|f| f.page_id == page),
            MoveDirection::Down => self.fields[index + 1..]
                .iter()
                .position(|f| f.page_id == page)
                .map(|offset| index + 1 + offset),
        };
        match neighbour {
            Some(other) => {
                self.fields.swap(index, other);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a page and return its id.
    ///
    pub fn add_page(&mut self) -> PageId {
        let page = self.pages.iter().copied().max().unwrap_or(0) + 1;
        self.pages.push(page);
        debug!("Added page {}", page);
        page
    }

    /// Delete a page together with every field placed on it. Refuses to
    /// delete the last remaining page.
    ///
    pub fn delete_page(&mut self, page: PageId) -> Result<Vec<FieldInstance>, FormError> {
        if !self.has_page(page) {
            return Err(FormError::PageNotFound(page));
        }
        if self.pages.len() <= 1 {
            warn!("Refusing to delete the last page {}", page);
            return Err(FormError::LastPage);
        }
        let (removed, kept): (Vec<FieldInstance>, Vec<FieldInstance>) = self
            .fields
            .drain(..)
            .partition(|f| f.page_id == page);
        self.fields = kept;
        self.pages.retain(|p| *p != page);
        debug!("Deleted page {} with {} field(s)", page, removed.len());
        Ok(removed)
    }

    pub fn set_pagination_enabled(&mut self, enabled: bool) {
        self.pagination_enabled = enabled;
    }

    pub fn apply_settings(&mut self, patch: SettingsPatch) {
        match patch {
            SettingsPatch::Title(title) => self.title = title,
            SettingsPatch::Description(description) => self.description = description,
            SettingsPatch::CoverEnabled(enabled) => self.cover_enabled = enabled,
            SettingsPatch::CoverImage(image) => {
                self.cover_image_ref = image.filter(|i| !i.trim().is_empty())
            }
            SettingsPatch::SuccessTitle(title) => self.success_title = title,
            SettingsPatch::SuccessDescription(description) => {
                self.success_description = description
            }
        }
    }

    /// Convert the placed fields back into template field definitions.
    ///
    pub fn to_template_fields(&self) -> Vec<TemplateField> {
        self.fields
            .iter()
            .map(|f| TemplateField {
                label: f.label.clone(),
                default_config: f.config.clone(),
            })
            .collect()
    }

    /// Verify the structural invariants.
    ///
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.pages.is_empty() {
            return Err("document has no pages".to_string());
        }
        let pages: HashSet<PageId> = self.pages.iter().copied().collect();
        if pages.len() != self.pages.len() {
            return Err("duplicate page ids".to_string());
        }
        let mut ids = HashSet::new();
        for field in &self.fields {
            if !pages.contains(&field.page_id) {
                return Err(format!(
                    "field {} references missing page {}",
                    field.id, field.page_id
                ));
            }
            if !ids.insert(&field.id) {
                return Err(format!("duplicate field id {}", field.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::library::ComponentLibrary;
    use crate::form::schema::ColumnKind;
    use crate::form::template::TemplateStore;

    fn text_max_length(field: &FieldInstance) -> Option<u32> {
        match &field.config {
            FieldConfig::Text(c) => c.max_length,
            _ => None,
        }
    }

    #[test]
    fn test_blank_document() {
        let document = FormDocument::blank(DesignerMode::Form);
        assert_eq!(document.pages(), &[1]);
        assert_eq!(document.fields().len(), 1);
        assert!(document.pagination_enabled());
        assert!(document.cover_enabled);
        assert!(document.check_invariants().is_ok());

        let template = FormDocument::blank(DesignerMode::Template);
        assert!(!template.pagination_enabled());
        assert!(!template.cover_enabled);
        assert_eq!(template.title, "新建模版");
    }

    #[test]
    fn test_insert_copies_library_default() {
        let library = ComponentLibrary::standard();
        let item = library.item(FieldKind::Text).unwrap();
        let mut document = FormDocument::empty(DesignerMode::Form);

        let first = document.insert_field(InsertSource::Library(item), 1).unwrap();
        let first = first[0].clone();
        document.update_field_label(&first, "Name".to_string()).unwrap();
        document
            .update_field_config(&first, FieldPatch::SetMaxLength(20))
            .unwrap();

        let second = document.insert_field(InsertSource::Library(item), 1).unwrap();
        let second = document.field(&second[0]).unwrap();
        assert_eq!(text_max_length(second), Some(100));
        assert_eq!(text_max_length(document.field(&first).unwrap()), Some(20));
        assert_eq!(item.default_config, FieldKind::Text.default_config());
    }

    #[test]
    fn test_insert_every_kind_is_independent() {
        let library = ComponentLibrary::standard();
        for item in library.items() {
            let mut document = FormDocument::empty(DesignerMode::Form);
            let ids = document.insert_field(InsertSource::Library(item), 1).unwrap();
            document
                .update_field_config(&ids[0], FieldPatch::SetRequired(!item.default_config.required()))
                .unwrap();
            document
                .update_field_config(&ids[0], FieldPatch::SetDescription(Some("changed".to_string())))
                .unwrap();
            assert_ne!(document.field(&ids[0]).unwrap().config, item.default_config);
            assert_eq!(item.default_config, item.kind.default_config());
        }
    }

    #[test]
    fn test_insert_template_bundle() {
        let store = TemplateStore::seeded();
        let template = store.get("tpl_identity").unwrap();
        let mut document = FormDocument::blank(DesignerMode::Form);
        let page = document.add_page();
        let ids = document
            .insert_field(InsertSource::Template(template), page)
            .unwrap();
        assert_eq!(ids.len(), 3);
        let labels: Vec<&str> = document
            .fields_on_page(page)
            .map(|f| f.label.as_str())
            .collect();
        assert_eq!(labels, vec!["姓名", "身份证号", "手机号码"]);

        document
            .update_field_config(&ids[1], FieldPatch::SetMaxLength(30))
            .unwrap();
        assert_eq!(
            store.get("tpl_identity").unwrap().fields[1].default_config,
            template.fields[1].default_config
        );
        assert!(matches!(
            &template.fields[1].default_config,
            FieldConfig::Text(c) if c.max_length == Some(18)
        ));
    }

    #[test]
    fn test_insert_on_missing_page() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let before = document.clone();
        assert_eq!(
            document.insert_field(InsertSource::Kind(FieldKind::Date), 9),
            Err(FormError::PageNotFound(9))
        );
        assert_eq!(document, before);
    }

    #[test]
    fn test_field_ids_unique() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        for kind in FieldKind::ALL {
            document.insert_field(InsertSource::Kind(kind), 1).unwrap();
        }
        assert!(document.check_invariants().is_ok());
        assert_eq!(document.fields().len(), FieldKind::ALL.len() + 1);
    }

    #[test]
    fn test_delete_last_page_is_refused() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let before = document.clone();
        assert_eq!(document.delete_page(1), Err(FormError::LastPage));
        assert_eq!(document, before);
        assert_eq!(document.pages(), &[1]);
    }

    #[test]
    fn test_delete_page_cascades_exactly() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let second = document.add_page();
        let third = document.add_page();
        document.insert_field(InsertSource::Kind(FieldKind::Number), second).unwrap();
        document.insert_field(InsertSource::Kind(FieldKind::Money), second).unwrap();
        let kept = document.insert_field(InsertSource::Kind(FieldKind::Date), third).unwrap();

        let removed = document.delete_page(second).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(removed.iter().all(|f| f.page_id == second));
        assert_eq!(document.pages(), &[1, third]);
        assert_eq!(document.fields().len(), 2);
        assert!(document.field(&kept[0]).is_some());
        assert!(document.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_missing_page() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        document.add_page();
        assert_eq!(document.delete_page(7), Err(FormError::PageNotFound(7)));
    }

    #[test]
    fn test_add_page_uses_max_plus_one() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let two = document.add_page();
        let three = document.add_page();
        document.delete_page(two).unwrap();
        assert_eq!(document.add_page(), three + 1);
    }

    #[test]
    fn test_pagination_toggle_keeps_fields() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let second = document.add_page();
        let third = document.add_page();
        document.insert_field(InsertSource::Kind(FieldKind::Text), second).unwrap();
        document.insert_field(InsertSource::Kind(FieldKind::Signature), third).unwrap();

        assert_eq!(document.visible_fields(third).len(), 1);
        document.set_pagination_enabled(false);
        assert_eq!(document.visible_fields(third).len(), 3);
        assert_eq!(document.fields().len(), 3);
        document.set_pagination_enabled(true);
        assert_eq!(document.visible_fields(second).len(), 1);
    }

    #[test]
    fn test_move_field_within_page() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let first = document.fields()[0].id.clone();
        let second = document.add_page();
        document.insert_field(InsertSource::Kind(FieldKind::Number), second).unwrap();
        let last = document.insert_field(InsertSource::Kind(FieldKind::Date), 1).unwrap();

        assert!(document.move_field(&last[0], MoveDirection::Up).unwrap());
        let order: Vec<&FieldId> = document.fields_on_page(1).map(|f| &f.id).collect();
        assert_eq!(order, vec![&last[0], &first]);
        assert!(!document.move_field(&last[0], MoveDirection::Up).unwrap());
        assert!(document.move_field(&last[0], MoveDirection::Down).unwrap());
        assert!(!document.move_field(&last[0], MoveDirection::Down).unwrap());
    }

    #[test]
    fn test_replace_config_kind_mismatch() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        let id = document.fields()[0].id.clone();
        assert_eq!(
            document.replace_field_config(&id, FieldKind::Date.default_config()),
            Err(FormError::KindMismatch {
                expected: FieldKind::Text,
                found: FieldKind::Date,
            })
        );
        document
            .replace_field_config(&id, FieldKind::Text.default_config())
            .unwrap();
        assert_eq!(text_max_length(document.field(&id).unwrap()), Some(100));
    }

    #[test]
    fn test_added_columns_get_unique_ids() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let ids = document
            .insert_field(InsertSource::Kind(FieldKind::SubTable), 1)
            .unwrap();
        document
            .update_field_config(&ids[0], FieldPatch::AddColumn(ColumnKind::Text))
            .unwrap();
        document
            .update_field_config(&ids[0], FieldPatch::AddColumn(ColumnKind::Dropdown))
            .unwrap();
        let table = document.field(&ids[0]).unwrap().config.as_sub_table().unwrap().clone();
        let column_ids: HashSet<&str> = table.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(column_ids.len(), 4);
    }

    #[test]
    fn test_added_column_after_template_round_trip() {
        let mut document = FormDocument::empty(DesignerMode::Template);
        let ids = document
            .insert_field(InsertSource::Kind(FieldKind::SubTable), 1)
            .unwrap();
        document
            .update_field_config(&ids[0], FieldPatch::AddColumn(ColumnKind::Date))
            .unwrap();
        let template = ComponentTemplate {
            id: "tpl_custom_9".to_string(),
            title: "家庭成员".to_string(),
            category: "我的模版".to_string(),
            kind: crate::form::template::TemplateKind::Custom,
            description: String::new(),
            fields: document.to_template_fields(),
            create_time: None,
        };

        let mut reopened = FormDocument::from_template(&template, DesignerMode::Template);
        let id = reopened.fields()[0].id.clone();
        reopened
            .update_field_config(&id, FieldPatch::AddColumn(ColumnKind::Text))
            .unwrap();
        let columns = |doc: &FormDocument| {
            doc.field(&id).unwrap().config.as_sub_table().unwrap().columns.clone()
        };
        let before = columns(&reopened);
        let unique: HashSet<&str> = before.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(unique.len(), before.len());

        let added = before.last().unwrap().id.clone();
        reopened
            .update_field_config(&id, FieldPatch::RemoveColumn(added))
            .unwrap();
        assert_eq!(columns(&reopened).len(), before.len() - 1);
    }

    #[test]
    fn test_from_template_and_back() {
        let store = TemplateStore::seeded();
        let template = store.get("tpl_edu").unwrap();
        let document = FormDocument::from_template(template, DesignerMode::Template);
        assert_eq!(document.title, "学历信息");
        assert_eq!(document.fields().len(), 3);
        assert_eq!(document.to_template_fields(), template.fields);
    }

    #[test]
    fn test_settings_patch() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        document.apply_settings(SettingsPatch::Title("秋季助学金申请表".to_string()));
        document.apply_settings(SettingsPatch::CoverImage(Some("  ".to_string())));
        assert_eq!(document.cover_image_ref, None);
        document.apply_settings(SettingsPatch::CoverImage(Some("cover.png".to_string())));
        assert_eq!(document.cover_image_ref.as_deref(), Some("cover.png"));
        assert_eq!(document.title, "秋季助学金申请表");
    }
}
