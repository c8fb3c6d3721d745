//! Designer engine.
//!
//! Owns one designer session: the document under edit, the selection, the
//! property panel tab, the active canvas page, the canvas sub-table rows and
//! the optional fill-mode preview. The terminal state forwards canvas input as
//! `CanvasEvent`s and panel input as `FieldEdit`/`SettingsEdit` values.

use super::document::{
    FieldId, FieldInstance, FormDocument, InsertSource, MoveDirection, PageId,
};
use super::error::FormError;
use super::fill::{FillIssue, FillState};
use super::library::LibraryItem;
use super::panel::{FieldEdit, SettingsEdit};
use super::patch::FieldPatch;
use super::render::{render_field, FieldView, RenderContext, RenderMode};
use super::subtable::{RowAppend, RowId, SubTableRows};
use super::template::{ComponentTemplate, TemplateDraft};
use crate::services::forms::FormItem;
use crate::services::persistence::{DraftReceipt, DraftSink};
use crate::services::ServiceError;
use log::*;
use std::collections::HashMap;

/// Specifying what the designer produces.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignerMode {
    Form,
    Template,
}

/// Selection state of the canvas.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Unselected,
    Selected(FieldId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    FieldProperties,
    DocumentSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryTab {
    Components,
    Templates,
}

/// Action targeted at a single field on the canvas.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Select,
    Delete,
    AddRow,
    RemoveRow,
    MoveUp,
    MoveDown,
}

/// Input received by the canvas. Only `Background` and `Header` clear the
/// selection; field-targeted events never do.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    Background,
    Header,
    Field { id: FieldId, action: FieldAction },
}

/// Form id and title handed to the channel screen on publish.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub form_id: Option<String>,
    pub form_title: String,
}

/// Outcome of advancing the preview.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStep {
    NextPage,
    Submitted,
    Invalid(usize),
}

/// Fill-mode preview of the document.
///
#[derive(Debug, Clone, Default)]
pub struct Preview {
    page_index: usize,
    fill: FillState,
    issues: Vec<FillIssue>,
    submitted: bool,
    cursor: usize,
}

impl Preview {
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn fill(&self) -> &FillState {
        &self.fill
    }

    pub fn fill_mut(&mut self) -> &mut FillState {
        &mut self.fill
    }

    pub fn issues(&self) -> &[FillIssue] {
        &self.issues
    }

    pub fn issue_for(&self, field: &FieldId) -> Option<&FillIssue> {
        self.issues.iter().find(|i| i.field == *field)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Index of the focused field among the fields of the current page.
    ///
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}

/// Houses one designer session.
///
#[derive(Debug, Clone)]
pub struct Designer {
    mode: DesignerMode,
    editing_template_id: Option<String>,
    document: FormDocument,
    selection: Selection,
    panel_tab: PanelTab,
    library_tab: LibraryTab,
    active_page: PageId,
    canvas_rows: HashMap<FieldId, SubTableRows>,
    preview: Option<Preview>,
}

impl Designer {
    /// Start a session on a document.
    ///
    pub fn new(mode: DesignerMode, document: FormDocument) -> Self {
        let active_page = document.pages().first().copied().unwrap_or(1);
        Designer {
            mode,
            editing_template_id: None,
            document,
            selection: Selection::Unselected,
            panel_tab: PanelTab::DocumentSettings,
            library_tab: LibraryTab::Components,
            active_page,
            canvas_rows: HashMap::new(),
            preview: None,
        }
    }

    pub fn blank(mode: DesignerMode) -> Self {
        Designer::new(mode, FormDocument::blank(mode))
    }

    pub fn for_form(item: &FormItem) -> Self {
        Designer::new(DesignerMode::Form, FormDocument::from_form_item(item))
    }

    /// Start a template-mode session editing an existing template. Saving
    /// updates the template when it is a custom one.
    ///
    pub fn for_template(template: &ComponentTemplate) -> Self {
        let mut designer = Designer::new(
            DesignerMode::Template,
            FormDocument::from_template(template, DesignerMode::Template),
        );
        if !template.is_system() {
            designer.editing_template_id = Some(template.id.clone());
        }
        designer
    }

    pub fn mode(&self) -> DesignerMode {
        self.mode
    }

    pub fn editing_template_id(&self) -> Option<&str> {
        self.editing_template_id.as_deref()
    }

    /// Record the id a new template was stored under, so later saves update
    /// it instead of creating another one.
    ///
    pub fn mark_saved_template(&mut self, id: String) {
        self.editing_template_id = Some(id);
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&FieldId> {
        match &self.selection {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn selected_field(&self) -> Option<&FieldInstance> {
        self.selected_id().and_then(|id| self.document.field(id))
    }

    pub fn panel_tab(&self) -> PanelTab {
        self.panel_tab
    }

    /// Switch the panel tab. The properties tab is only reachable with a
    /// selected field.
    ///
    pub fn set_panel_tab(&mut self, tab: PanelTab) {
        match tab {
            PanelTab::DocumentSettings => self.clear_selection(),
            PanelTab::FieldProperties if self.selected_id().is_some() => {
                self.panel_tab = PanelTab::FieldProperties
            }
            PanelTab::FieldProperties => {}
        }
    }

    pub fn library_tab(&self) -> LibraryTab {
        self.library_tab
    }

    pub fn set_library_tab(&mut self, tab: LibraryTab) {
        self.library_tab = tab;
    }

    pub fn active_page(&self) -> PageId {
        self.active_page
    }

    /// Fields shown on the canvas for the active page.
    ///
    pub fn visible_fields(&self) -> Vec<&FieldInstance> {
        self.document.visible_fields(self.active_page)
    }

    /// Render the visible canvas fields in design mode.
    ///
    pub fn canvas_views(&self) -> Vec<FieldView> {
        self.visible_fields()
            .into_iter()
            .map(|field| {
                let ctx = RenderContext {
                    selected: self.selected_id() == Some(&field.id),
                    rows: self.canvas_rows.get(&field.id),
                };
                render_field(field, RenderMode::Design, ctx)
            })
            .collect()
    }

    pub fn canvas_rows(&self, field: &FieldId) -> Option<&SubTableRows> {
        self.canvas_rows.get(field)
    }

    pub fn select_field(&mut self, id: &FieldId) -> Result<(), FormError> {
        if self.document.field(id).is_none() {
            return Err(FormError::FieldNotFound(id.to_string()));
        }
        self.selection = Selection::Selected(id.clone());
        self.panel_tab = PanelTab::FieldProperties;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::Unselected;
        self.panel_tab = PanelTab::DocumentSettings;
    }

    /// Move the selection to the next or previous visible field, wrapping.
    ///
    pub fn select_adjacent(&mut self, forward: bool) {
        let ids: Vec<FieldId> = self.visible_fields().iter().map(|f| f.id.clone()).collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .selected_id()
            .and_then(|id| ids.iter().position(|i| i == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.selection = Selection::Selected(ids[next].clone());
        self.panel_tab = PanelTab::FieldProperties;
    }

    /// Handle a canvas interaction.
    ///
    pub fn dispatch(&mut self, event: CanvasEvent) -> Result<(), FormError> {
        match event {
            CanvasEvent::Background | CanvasEvent::Header => {
                self.clear_selection();
                Ok(())
            }
            CanvasEvent::Field { id, action } => match action {
                FieldAction::Select => self.select_field(&id),
                FieldAction::Delete => self.delete_field(&id).map(|_| ()),
                FieldAction::AddRow => self.add_canvas_row(&id).map(|_| ()),
                FieldAction::RemoveRow => self.remove_canvas_row(&id).map(|_| ()),
                FieldAction::MoveUp => self.move_field(&id, MoveDirection::Up).map(|_| ()),
                FieldAction::MoveDown => self.move_field(&id, MoveDirection::Down).map(|_| ()),
            },
        }
    }

    fn insertion_page(&self) -> PageId {
        if self.document.has_page(self.active_page) {
            self.active_page
        } else {
            self.document.pages().last().copied().unwrap_or(1)
        }
    }

    /// Insert a library item on the active page and select it.
    ///
    pub fn add_library_item(&mut self, item: &LibraryItem) -> Result<FieldId, FormError> {
        let page = self.insertion_page();
        let ids = self.document.insert_field(InsertSource::Library(item), page)?;
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| FormError::FieldNotFound(item.label.clone()))?;
        self.select_field(&id)?;
        Ok(id)
    }

    /// Insert every field of a template on the active page.
    ///
    pub fn add_template(&mut self, template: &ComponentTemplate) -> Result<Vec<FieldId>, FormError> {
        let page = self.insertion_page();
        let ids = self
            .document
            .insert_field(InsertSource::Template(template), page)?;
        info!("Inserted template '{}' ({} fields)", template.title, ids.len());
        Ok(ids)
    }

    pub fn delete_field(&mut self, id: &FieldId) -> Result<FieldInstance, FormError> {
        let removed = self.document.delete_field(id)?;
        self.canvas_rows.remove(id);
        if self.selected_id() == Some(id) {
            self.clear_selection();
        }
        Ok(removed)
    }

    /// Delete the selected field, if any.
    ///
    pub fn delete_selected(&mut self) -> Result<Option<FieldInstance>, FormError> {
        match self.selected_id().cloned() {
            Some(id) => self.delete_field(&id).map(Some),
            None => Ok(None),
        }
    }

    pub fn move_field(&mut self, id: &FieldId, direction: MoveDirection) -> Result<bool, FormError> {
        self.document.move_field(id, direction)
    }

    /// Apply a property panel edit to the selected field.
    ///
    pub fn update_selected(&mut self, edit: FieldEdit) -> Result<(), FormError> {
        let id = self
            .selected_id()
            .cloned()
            .ok_or_else(|| FormError::FieldNotFound("no field selected".to_string()))?;
        match edit {
            FieldEdit::Label(label) => self.document.update_field_label(&id, label),
            FieldEdit::Patch(patch) => {
                let lowered = match &patch {
                    FieldPatch::SetMaxRows(limit) => Some(*limit),
                    _ => None,
                };
                self.document.update_field_config(&id, patch)?;
                if let Some(limit) = lowered {
                    if let Some(rows) = self.canvas_rows.get_mut(&id) {
                        rows.clamp_to(limit);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn apply_setting(&mut self, edit: SettingsEdit) {
        match edit {
            SettingsEdit::Patch(patch) => self.document.apply_settings(patch),
            SettingsEdit::Pagination(enabled) => self.set_pagination_enabled(enabled),
        }
    }

    pub fn set_pagination_enabled(&mut self, enabled: bool) {
        self.document.set_pagination_enabled(enabled);
        debug!("Pagination {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Append a page and make it active.
    ///
    pub fn add_page(&mut self) -> PageId {
        let page = self.document.add_page();
        self.active_page = page;
        page
    }

    /// Delete a page and its fields. The last page becomes active.
    ///
    pub fn delete_page(&mut self, page: PageId) -> Result<Vec<FieldInstance>, FormError> {
        let removed = self.document.delete_page(page)?;
        for field in &removed {
            self.canvas_rows.remove(&field.id);
        }
        let orphaned = self
            .selected_id()
            .map(|id| self.document.field(id).is_none())
            .unwrap_or(false);
        if orphaned {
            self.clear_selection();
        }
        self.active_page = self.document.pages().last().copied().unwrap_or(1);
        Ok(removed)
    }

    pub fn select_page(&mut self, page: PageId) -> Result<(), FormError> {
        if !self.document.has_page(page) {
            return Err(FormError::PageNotFound(page));
        }
        self.active_page = page;
        Ok(())
    }

    /// Step the active page forward or backward without wrapping.
    ///
    pub fn step_page(&mut self, forward: bool) {
        let pages = self.document.pages();
        let index = self.document.page_index(self.active_page).unwrap_or(0);
        let next = if forward {
            (index + 1).min(pages.len() - 1)
        } else {
            index.saturating_sub(1)
        };
        self.active_page = pages[next];
    }

    fn sub_table_limit(&self, id: &FieldId) -> Result<u32, FormError> {
        let field = self
            .document
            .field(id)
            .ok_or_else(|| FormError::FieldNotFound(id.to_string()))?;
        field
            .config
            .as_sub_table()
            .map(|c| c.effective_max_rows())
            .ok_or(FormError::PatchNotApplicable {
                kind: field.kind(),
                property: "rows",
            })
    }

    /// Append a row to a sub-table on the canvas.
    ///
    pub fn add_canvas_row(&mut self, id: &FieldId) -> Result<RowAppend, FormError> {
        let limit = self.sub_table_limit(id)?;
        let outcome = self.canvas_rows.entry(id.clone()).or_default().add_row(limit);
        if outcome == RowAppend::LimitReached {
            debug!("Sub-table {} is at its {} row limit", id, limit);
        }
        Ok(outcome)
    }

    /// Remove the most recently added row of a sub-table on the canvas.
    ///
    pub fn remove_canvas_row(&mut self, id: &FieldId) -> Result<bool, FormError> {
        let last = self
            .canvas_rows
            .get(id)
            .and_then(|rows| rows.rows().last().copied());
        match last {
            Some(row) => self.remove_canvas_row_by_id(id, row),
            None => self.sub_table_limit(id).map(|_| false),
        }
    }

    /// Remove one specific row. Returns false when the row is not on the canvas.
    ///
    pub fn remove_canvas_row_by_id(&mut self, id: &FieldId, row: RowId) -> Result<bool, FormError> {
        self.sub_table_limit(id)?;
        Ok(self
            .canvas_rows
            .get_mut(id)
            .map(|rows| rows.remove_row(row))
            .unwrap_or(false))
    }

    /// Page ids the preview walks through.
    ///
    fn preview_pages(&self) -> Vec<PageId> {
        if self.document.pagination_enabled() {
            self.document.pages().to_vec()
        } else {
            self.document.pages().iter().take(1).copied().collect()
        }
    }

    pub fn open_preview(&mut self) {
        self.preview = Some(Preview::default());
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut Preview> {
        self.preview.as_mut()
    }

    /// Number of preview pages.
    ///
    pub fn preview_page_count(&self) -> usize {
        self.preview_pages().len()
    }

    /// Fields shown on the current preview page.
    ///
    pub fn preview_fields(&self) -> Vec<&FieldInstance> {
        let index = self.preview.as_ref().map(|p| p.page_index).unwrap_or(0);
        if !self.document.pagination_enabled() {
            return self.document.fields().iter().collect();
        }
        match self.preview_pages().get(index) {
            Some(page) => self.document.fields_on_page(*page).collect(),
            None => vec![],
        }
    }

    /// Render the current preview page in fill mode.
    ///
    pub fn preview_views(&self) -> Vec<FieldView> {
        let preview = match &self.preview {
            Some(preview) => preview,
            None => return vec![],
        };
        self.preview_fields()
            .into_iter()
            .map(|field| {
                let ctx = RenderContext {
                    selected: false,
                    rows: preview.fill.rows(&field.id),
                };
                render_field(field, RenderMode::Fill, ctx)
            })
            .collect()
    }

    pub fn preview_back(&mut self) {
        if let Some(preview) = self.preview.as_mut() {
            preview.page_index = preview.page_index.saturating_sub(1);
            preview.cursor = 0;
        }
    }

    /// Go to the next preview page, or submit on the last page. Submission
    /// validates the whole form and jumps to the first page with an issue.
    ///
    pub fn preview_advance(&mut self) -> Option<PreviewStep> {
        let pages = self.preview_pages();
        let issues = match &self.preview {
            Some(preview) => preview.fill.validate(&self.document),
            None => return None,
        };
        let preview = self.preview.as_mut()?;
        if preview.submitted {
            return None;
        }
        if preview.page_index + 1 < pages.len() {
            preview.page_index += 1;
            preview.cursor = 0;
            return Some(PreviewStep::NextPage);
        }
        if let Some(first) = issues.first() {
            let target = pages.iter().position(|p| *p == first.page).unwrap_or(0);
            preview.page_index = target;
            preview.cursor = 0;
            let count = issues.len();
            preview.issues = issues;
            warn!("Preview submission has {} issue(s)", count);
            return Some(PreviewStep::Invalid(count));
        }
        preview.issues.clear();
        preview.submitted = true;
        info!("Preview of '{}' submitted", self.document.title);
        Some(PreviewStep::Submitted)
    }

    /// Hand the document to a draft sink.
    ///
    pub fn save_draft(&self, sink: &dyn DraftSink) -> Result<DraftReceipt, ServiceError> {
        sink.save_draft(&self.document)
    }

    pub fn publish(&self) -> PublishTarget {
        info!("Publishing form '{}'", self.document.title);
        PublishTarget {
            form_id: self.document.id.clone(),
            form_title: self.document.title.clone(),
        }
    }

    /// Return the document as a template draft.
    ///
    pub fn template_draft(&self) -> TemplateDraft {
        TemplateDraft {
            title: self.document.title.clone(),
            description: self.document.description.clone(),
            fields: self.document.to_template_fields(),
        }
    }
}
