use crate::app::ConfigSaveSender;
use crate::config::{Config, ViewHotkeys};
use crate::error::AppError;
use crate::form::designer::{
    CanvasEvent, DesignerMode, FieldAction, LibraryTab, PanelTab, PreviewStep, PublishTarget,
};
use crate::form::document::{FieldInstance, MoveDirection};
use crate::form::panel::{property_controls, settings_controls, ControlInput, PropertyControl, SettingsControl};
use crate::form::schema::FieldConfig;
use crate::form::subtable::RowAppend;
use crate::form::template::{ComponentTemplate, TemplateKind, TemplateStore};
use crate::form::{ComponentLibrary, Designer, FieldId};
use crate::logger::LogBuffer;
use crate::services::channels::{generate_tag, share_link, Channel, ChannelStore};
use crate::services::persistence::{DraftSink, LogDraftSink};
use crate::services::submissions::{
    AnalysisReport, SubmissionFilter, SubmissionPage, SubmissionStore,
};
use crate::services::{Dashboard, FormCatalog, FormItem, ServiceError};
use crate::ui::Theme;
use clipboard::{ClipboardContext, ClipboardProvider};
use log::*;
use std::collections::HashSet;

use super::error::StateError;
use super::modal::{Confirmation, InputTarget, StatusLevel, StatusMessage, TextInput};
use super::navigation::{DesignerPane, Focus, TemplateTab, View, MENU_VIEWS};

/// Maximum number of log lines kept for the log panel.
const MAX_LOG_ENTRIES: usize = 500;

/// One row of the designer's property panel.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEntry {
    Property(PropertyControl),
    Setting(SettingsControl),
}

/// Houses data representative of console state.
///
pub struct State {
    config_save_sender: Option<ConfigSaveSender>,
    log_buffer: Option<LogBuffer>,
    current_focus: Focus,
    menu_index: usize,
    view_stack: Vec<View>,
    theme: Theme,
    hotkeys: ViewHotkeys,
    page_size: usize,
    share_base_url: String,
    status: Option<StatusMessage>,
    confirmation: Option<Confirmation>,
    text_input: Option<TextInput>,
    debug_mode: bool,
    debug_index: usize,
    debug_entries: Vec<String>,
    dashboard: Dashboard,
    dashboard_index: usize,
    catalog: FormCatalog,
    forms_index: usize,
    library: ComponentLibrary,
    templates: TemplateStore,
    designer: Option<Designer>,
    designer_pane: DesignerPane,
    library_index: usize,
    property_index: usize,
    option_index: usize,
    draft_sink: Box<dyn DraftSink>,
    template_tab: TemplateTab,
    template_index: usize,
    template_preview: bool,
    channels: ChannelStore,
    channel_index: usize,
    publish_target: Option<PublishTarget>,
    submissions: SubmissionStore,
    submission_filter: SubmissionFilter,
    submission_page: usize,
    submission_cursor: usize,
    selected_submissions: HashSet<String>,
    analysis_title: Option<String>,
    analysis_report: Option<AnalysisReport>,
}

/// Defines default console state.
///
impl Default for State {
    fn default() -> State {
        State {
            config_save_sender: None,
            log_buffer: None,
            current_focus: Focus::View,
            menu_index: 0,
            view_stack: vec![View::Dashboard],
            theme: Theme::default(),
            hotkeys: ViewHotkeys::default(),
            page_size: 20,
            share_base_url: crate::services::channels::DEFAULT_SHARE_BASE_URL.to_string(),
            status: None,
            confirmation: None,
            text_input: None,
            debug_mode: false,
            debug_index: 0,
            debug_entries: vec![],
            dashboard: Dashboard::seeded(),
            dashboard_index: 0,
            catalog: FormCatalog::seeded(),
            forms_index: 0,
            library: ComponentLibrary::standard(),
            templates: TemplateStore::seeded(),
            designer: None,
            designer_pane: DesignerPane::Canvas,
            library_index: 0,
            property_index: 0,
            option_index: 0,
            draft_sink: Box::new(LogDraftSink::default()),
            template_tab: TemplateTab::System,
            template_index: 0,
            template_preview: false,
            channels: ChannelStore::seeded(),
            channel_index: 0,
            publish_target: None,
            submissions: SubmissionStore::seeded(),
            submission_filter: SubmissionFilter::default(),
            submission_page: 1,
            submission_cursor: 0,
            selected_submissions: HashSet::new(),
            analysis_title: None,
            analysis_report: None,
        }
    }
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), StateError> {
    let mut ctx: ClipboardContext =
        ClipboardProvider::new().map_err(|e| StateError::Clipboard(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| StateError::Clipboard(e.to_string()))
}

impl State {
    pub fn new(
        config: &Config,
        config_save_sender: ConfigSaveSender,
        log_buffer: LogBuffer,
    ) -> Self {
        State {
            config_save_sender: Some(config_save_sender),
            log_buffer: Some(log_buffer),
            theme: Theme::from_name(&config.theme_name).unwrap_or_default(),
            hotkeys: config.hotkeys(),
            page_size: config.page_size.max(1),
            share_base_url: config.share_base_url.clone(),
            ..State::default()
        }
    }

    /// Get the current theme.
    ///
    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    /// Switch to the next theme and ask for the configuration to be saved.
    ///
    pub fn cycle_theme(&mut self) -> &mut Self {
        let names = Theme::available_themes();
        let index = names
            .iter()
            .position(|name| *name == self.theme.name)
            .unwrap_or(0);
        let next = &names[step(index, names.len(), true)];
        if let Some(theme) = Theme::from_name(next) {
            info!("Switched theme to {}", theme.name);
            self.theme = theme;
        }
        if let Some(sender) = &self.config_save_sender {
            if let Err(e) = sender.send(()) {
                warn!("Failed to request config save: {}", e);
            }
        }
        self
    }

    pub fn get_hotkeys(&self) -> &ViewHotkeys {
        &self.hotkeys
    }

    // Navigation

    pub fn current_view(&self) -> View {
        self.view_stack.last().copied().unwrap_or(View::Dashboard)
    }

    pub fn view_stack_len(&self) -> usize {
        self.view_stack.len()
    }

    pub fn push_view(&mut self, view: View) -> &mut Self {
        if self.current_view() != view {
            self.view_stack.push(view);
        }
        self.current_focus = Focus::View;
        self
    }

    /// Pop the current view. The root view is never popped.
    ///
    pub fn pop_view(&mut self) -> Option<View> {
        if self.view_stack.len() <= 1 {
            return None;
        }
        let popped = self.view_stack.pop();
        if popped == Some(View::Designer) {
            self.designer = None;
        }
        popped
    }

    /// Replace the whole view stack with a sidebar section.
    ///
    pub fn jump_to(&mut self, view: View) -> &mut Self {
        if let Some(index) = MENU_VIEWS.iter().position(|v| *v == view) {
            self.menu_index = index;
        }
        self.view_stack = vec![view];
        self.designer = None;
        self.current_focus = Focus::View;
        debug!("Jumped to {:?}", view);
        self
    }

    /// Leave the current view, or move focus to the sidebar at the root.
    ///
    pub fn back(&mut self) -> &mut Self {
        if self.pop_view().is_none() {
            self.focus_menu();
        }
        self
    }

    pub fn current_focus(&self) -> Focus {
        self.current_focus
    }

    pub fn focus_menu(&mut self) -> &mut Self {
        self.current_focus = Focus::Menu;
        self
    }

    pub fn focus_view(&mut self) -> &mut Self {
        self.current_focus = Focus::View;
        self
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn next_menu(&mut self) -> &mut Self {
        self.menu_index = step(self.menu_index, MENU_VIEWS.len(), true);
        self
    }

    pub fn previous_menu(&mut self) -> &mut Self {
        self.menu_index = step(self.menu_index, MENU_VIEWS.len(), false);
        self
    }

    pub fn select_menu(&mut self) -> &mut Self {
        let view = MENU_VIEWS[self.menu_index.min(MENU_VIEWS.len() - 1)];
        self.jump_to(view)
    }

    // Status line

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, text: impl Into<String>) -> &mut Self {
        self.status = Some(StatusMessage::new(text.into(), StatusLevel::Info));
        self
    }

    pub fn set_error(&mut self, error: impl std::fmt::Display) -> &mut Self {
        warn!("{}", error);
        self.status = Some(StatusMessage::new(error.to_string(), StatusLevel::Error));
        self
    }

    /// Surface an error on the status line and drop the value.
    ///
    fn report<T, E: Into<AppError>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let error: AppError = e.into();
                self.set_error(error);
                None
            }
        }
    }

    /// Advance timers and collect captured log lines.
    ///
    pub fn tick(&mut self) {
        if let Some(status) = self.status.as_mut() {
            if !status.tick() {
                self.status = None;
            }
        }
        let lines = match &self.log_buffer {
            Some(buffer) => match buffer.lock() {
                Ok(mut guard) => std::mem::take(&mut *guard),
                Err(_) => vec![],
            },
            None => vec![],
        };
        for line in lines {
            self.add_log_entry(line);
        }
    }

    // Log panel

    pub fn add_log_entry(&mut self, line: String) -> &mut Self {
        self.debug_entries.push(line);
        if self.debug_entries.len() > MAX_LOG_ENTRIES {
            let excess = self.debug_entries.len() - MAX_LOG_ENTRIES;
            self.debug_entries.drain(..excess);
        }
        self
    }

    pub fn get_debug_entries(&self) -> &[String] {
        &self.debug_entries
    }

    pub fn get_debug_index(&self) -> usize {
        self.debug_index
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn toggle_debug_mode(&mut self) -> &mut Self {
        self.debug_mode = !self.debug_mode;
        self.debug_index = self.debug_entries.len().saturating_sub(1);
        self
    }

    pub fn next_debug_entry(&mut self) -> &mut Self {
        if self.debug_index + 1 < self.debug_entries.len() {
            self.debug_index += 1;
        }
        self
    }

    pub fn previous_debug_entry(&mut self) -> &mut Self {
        self.debug_index = self.debug_index.saturating_sub(1);
        self
    }

    pub fn copy_debug_entry(&mut self) -> &mut Self {
        if let Some(entry) = self.debug_entries.get(self.debug_index).cloned() {
            if self.report(copy_to_clipboard(&entry)).is_some() {
                self.set_status("Copied log line");
            }
        }
        self
    }

    // Dashboard

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_index(&self) -> usize {
        self.dashboard_index
    }

    pub fn navigate_dashboard(&mut self, forward: bool) -> &mut Self {
        let len = self.dashboard.pending_tasks().len();
        self.dashboard_index = step(self.dashboard_index, len, forward);
        self
    }

    // Form list

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn forms_index(&self) -> usize {
        self.forms_index
    }

    pub fn navigate_forms(&mut self, forward: bool) -> &mut Self {
        let len = self.catalog.list_forms().len();
        self.forms_index = step(self.forms_index, len, forward);
        self
    }

    pub fn selected_form(&self) -> Option<&FormItem> {
        self.catalog.list_forms().get(self.forms_index)
    }

    fn require_selected_form(&self) -> Result<FormItem, StateError> {
        self.selected_form().cloned().ok_or(StateError::NoFormSelected)
    }

    /// Open the designer on the selected form.
    ///
    pub fn edit_selected_form(&mut self) -> &mut Self {
        let result = self.require_selected_form();
        if let Some(item) = self.report(result) {
            info!("Opening designer for form {}", item.id);
            self.open_designer(Designer::for_form(&item));
        }
        self
    }

    /// Open the designer on a blank form.
    ///
    pub fn create_form(&mut self) -> &mut Self {
        self.open_designer(Designer::blank(DesignerMode::Form));
        self
    }

    /// Open the selected form straight into the fill-mode preview.
    ///
    pub fn preview_selected_form(&mut self) -> &mut Self {
        self.edit_selected_form();
        if self.designer.is_some() {
            self.open_preview();
        }
        self
    }

    pub fn open_channels_for_selected(&mut self) -> &mut Self {
        let result = self.require_selected_form();
        if let Some(item) = self.report(result) {
            self.open_publish(PublishTarget {
                form_id: Some(item.id.clone()),
                form_title: item.title.clone(),
            });
        }
        self
    }

    pub fn open_data_for_selected(&mut self) -> &mut Self {
        let result = self.require_selected_form();
        if let Some(item) = self.report(result) {
            self.open_analysis(Some(item.title), SubmissionFilter::default());
        }
        self
    }

    fn open_analysis(&mut self, title: Option<String>, filter: SubmissionFilter) -> &mut Self {
        self.analysis_title = title;
        self.analysis_report = None;
        self.submission_filter = filter;
        self.submission_page = 1;
        self.submission_cursor = 0;
        self.push_view(View::Analysis)
    }

    // Designer session

    pub fn designer(&self) -> Option<&Designer> {
        self.designer.as_ref()
    }

    pub fn library(&self) -> &ComponentLibrary {
        &self.library
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn open_designer(&mut self, designer: Designer) -> &mut Self {
        self.designer = Some(designer);
        self.designer_pane = DesignerPane::Canvas;
        self.library_index = 0;
        self.property_index = 0;
        self.option_index = 0;
        self.push_view(View::Designer);
        self
    }

    /// Run an operation on the open designer and report its failure.
    ///
    fn with_designer<T>(
        &mut self,
        f: impl FnOnce(&mut Designer) -> Result<T, AppError>,
    ) -> Option<T> {
        let result = match self.designer.as_mut() {
            Some(designer) => f(designer),
            None => Err(StateError::DesignerNotOpen.into()),
        };
        self.report(result)
    }

    pub fn designer_pane(&self) -> DesignerPane {
        self.designer_pane
    }

    pub fn library_index(&self) -> usize {
        self.library_index
    }

    pub fn property_index(&self) -> usize {
        self.property_index
    }

    pub fn switch_pane(&mut self, forward: bool) -> &mut Self {
        self.designer_pane = if forward {
            self.designer_pane.next()
        } else {
            self.designer_pane.previous()
        };
        self.property_index = 0;
        self
    }

    /// Number of entries in the active library tab.
    ///
    pub fn library_len(&self) -> usize {
        match self.designer.as_ref().map(|d| d.library_tab()) {
            Some(LibraryTab::Templates) => self.templates.list().len(),
            _ => self.library.len(),
        }
    }

    /// Rows of the property panel for the current selection and tab.
    ///
    pub fn panel_entries(&self) -> Vec<PanelEntry> {
        let designer = match &self.designer {
            Some(designer) => designer,
            None => return vec![],
        };
        match (designer.panel_tab(), designer.selected_field()) {
            (PanelTab::FieldProperties, Some(field)) => property_controls(field)
                .into_iter()
                .map(PanelEntry::Property)
                .collect(),
            _ => settings_controls(designer.mode())
                .into_iter()
                .map(PanelEntry::Setting)
                .collect(),
        }
    }

    /// Move within the active designer pane.
    ///
    pub fn navigate_designer(&mut self, forward: bool) -> &mut Self {
        match self.designer_pane {
            DesignerPane::Library => {
                self.library_index = step(self.library_index, self.library_len(), forward);
            }
            DesignerPane::Canvas => {
                if let Some(designer) = self.designer.as_mut() {
                    designer.select_adjacent(forward);
                }
                self.property_index = 0;
            }
            DesignerPane::Properties => {
                let len = self.panel_entries().len();
                self.property_index = step(self.property_index, len, forward);
            }
        }
        self
    }

    /// Switch the tab of the active pane. On the canvas this steps pages.
    ///
    pub fn switch_designer_tab(&mut self, forward: bool) -> &mut Self {
        let pane = self.designer_pane;
        if let Some(designer) = self.designer.as_mut() {
            match pane {
                DesignerPane::Library => {
                    let tab = match designer.library_tab() {
                        LibraryTab::Components => LibraryTab::Templates,
                        LibraryTab::Templates => LibraryTab::Components,
                    };
                    designer.set_library_tab(tab);
                    self.library_index = 0;
                }
                DesignerPane::Canvas => designer.step_page(forward),
                DesignerPane::Properties => {
                    let tab = match designer.panel_tab() {
                        PanelTab::FieldProperties => PanelTab::DocumentSettings,
                        PanelTab::DocumentSettings => PanelTab::FieldProperties,
                    };
                    designer.set_panel_tab(tab);
                    self.property_index = 0;
                }
            }
        }
        self
    }

    /// Enter on the designer: insert from the library, select on the canvas
    /// or edit the focused property.
    ///
    pub fn designer_select(&mut self) -> &mut Self {
        match self.designer_pane {
            DesignerPane::Library => self.insert_library_entry(),
            DesignerPane::Canvas => {
                let has_selection = self
                    .designer
                    .as_ref()
                    .map(|d| d.selected_id().is_some())
                    .unwrap_or(false);
                if has_selection {
                    self.designer_pane = DesignerPane::Properties;
                    self.property_index = 0;
                } else if let Some(designer) = self.designer.as_mut() {
                    designer.select_adjacent(true);
                }
                self
            }
            DesignerPane::Properties => self.activate_property(),
        }
    }

    /// Insert the focused library entry on the active page.
    ///
    pub fn insert_library_entry(&mut self) -> &mut Self {
        let tab = self.designer.as_ref().map(|d| d.library_tab());
        let index = self.library_index;
        let inserted = match tab {
            Some(LibraryTab::Templates) => {
                let template = self.templates.list().get(index).cloned();
                self.with_designer(|designer| match template {
                    Some(template) => Ok((template.title.clone(), designer.add_template(&template)?.len())),
                    None => Err(StateError::NoTemplateSelected.into()),
                })
            }
            _ => {
                let item = self.library.item_at(index).cloned();
                self.with_designer(|designer| match item {
                    Some(item) => {
                        designer.add_library_item(&item)?;
                        Ok((item.label.clone(), 1))
                    }
                    None => Err(StateError::NoFieldSelected.into()),
                })
            }
        };
        if let Some((label, count)) = inserted {
            self.set_status(format!("Added {} ({} field(s))", label, count));
        }
        self
    }

    fn selected_field_id(&self) -> Option<FieldId> {
        self.designer.as_ref().and_then(|d| d.selected_id().cloned())
    }

    fn selected_field(&self) -> Option<FieldInstance> {
        self.designer.as_ref().and_then(|d| d.selected_field().cloned())
    }

    /// Deselect the canvas, the same as clicking its background.
    ///
    pub fn clear_canvas_selection(&mut self) -> &mut Self {
        self.with_designer(|designer| Ok(designer.dispatch(CanvasEvent::Background)?));
        self.property_index = 0;
        self
    }

    /// Show the document settings, the same as clicking the form header.
    ///
    pub fn open_document_settings(&mut self) -> &mut Self {
        if self
            .with_designer(|designer| Ok(designer.dispatch(CanvasEvent::Header)?))
            .is_some()
        {
            self.designer_pane = DesignerPane::Properties;
            self.property_index = 0;
        }
        self
    }

    /// Delete key on the designer: ask to delete the selected field on the
    /// canvas, remove the focused option or column in the panel.
    ///
    pub fn designer_delete(&mut self) -> &mut Self {
        match self.designer_pane {
            DesignerPane::Properties => self.remove_property(),
            _ => match self.selected_field() {
                Some(field) => self.request_confirmation(Confirmation::DeleteField {
                    id: field.id,
                    label: field.label,
                }),
                None => self.set_error(StateError::NoFieldSelected),
            },
        }
    }

    /// Forward a field action on the selected field to the canvas.
    ///
    fn canvas_field_action(&mut self, action: FieldAction) -> bool {
        let id = match self.selected_field_id() {
            Some(id) => id,
            None => {
                self.set_error(StateError::NoFieldSelected);
                return false;
            }
        };
        self.with_designer(|designer| Ok(designer.dispatch(CanvasEvent::Field { id, action })?))
            .is_some()
    }

    pub fn move_selected_field(&mut self, direction: MoveDirection) -> &mut Self {
        let action = match direction {
            MoveDirection::Up => FieldAction::MoveUp,
            MoveDirection::Down => FieldAction::MoveDown,
        };
        self.canvas_field_action(action);
        self
    }

    /// Append a canvas row to the selected sub-table.
    ///
    pub fn add_canvas_row(&mut self) -> &mut Self {
        let id = match self.selected_field_id() {
            Some(id) => id,
            None => return self.set_error(StateError::NoFieldSelected),
        };
        match self.with_designer(|designer| Ok(designer.add_canvas_row(&id)?)) {
            Some(RowAppend::LimitReached) => self.set_status("Row limit reached"),
            _ => self,
        }
    }

    pub fn remove_canvas_row(&mut self) -> &mut Self {
        self.canvas_field_action(FieldAction::RemoveRow);
        self
    }

    pub fn add_page(&mut self) -> &mut Self {
        if let Some(page) = self.with_designer(|designer| Ok(designer.add_page())) {
            debug!("Added page {}", page);
            self.set_status("Page added");
        }
        self
    }

    /// Ask to delete the active page. The last page is refused straight away.
    ///
    pub fn request_delete_page(&mut self) -> &mut Self {
        let designer = match &self.designer {
            Some(designer) => designer,
            None => return self.set_error(StateError::DesignerNotOpen),
        };
        let document = designer.document();
        if document.pages().len() <= 1 {
            return self.set_error(crate::form::FormError::LastPage);
        }
        let page = designer.active_page();
        let confirmation = Confirmation::DeletePage {
            page,
            position: document.page_index(page).map(|i| i + 1).unwrap_or(1),
            field_count: document.fields_on_page(page).count(),
        };
        self.request_confirmation(confirmation)
    }

    /// Enter on a property row: open the editor for text controls, apply
    /// toggles and actions at once.
    ///
    pub fn activate_property(&mut self) -> &mut Self {
        let entry = match self.panel_entries().get(self.property_index).cloned() {
            Some(entry) => entry,
            None => return self,
        };
        match entry {
            PanelEntry::Property(control) => {
                let field = match self.selected_field() {
                    Some(field) => field,
                    None => return self.set_error(StateError::NoFieldSelected),
                };
                match control.input() {
                    ControlInput::Text => {
                        let title = control.label(&field);
                        let value = control.display_value(&field);
                        self.open_text_input(InputTarget::Property(control), title, &value);
                    }
                    ControlInput::Toggle | ControlInput::Action => {
                        if let Some(edit) = control.activate(&field) {
                            self.with_designer(|designer| Ok(designer.update_selected(edit)?));
                        }
                    }
                }
            }
            PanelEntry::Setting(control) => {
                let document = match &self.designer {
                    Some(designer) => designer.document().clone(),
                    None => return self.set_error(StateError::DesignerNotOpen),
                };
                match control.input() {
                    ControlInput::Text => {
                        let value = control.display_value(&document);
                        self.open_text_input(
                            InputTarget::Setting(control),
                            control.label().to_string(),
                            &value,
                        );
                    }
                    ControlInput::Toggle | ControlInput::Action => {
                        if let Some(edit) = control.activate(&document) {
                            self.with_designer(|designer| {
                                designer.apply_setting(edit);
                                Ok(())
                            });
                        }
                    }
                }
            }
        }
        self
    }

    /// Remove the focused option or column.
    ///
    pub fn remove_property(&mut self) -> &mut Self {
        let edit = match self.panel_entries().get(self.property_index) {
            Some(PanelEntry::Property(control)) if control.removable() => control.remove(),
            _ => None,
        };
        if let Some(edit) = edit {
            if self
                .with_designer(|designer| Ok(designer.update_selected(edit)?))
                .is_some()
            {
                let len = self.panel_entries().len();
                self.property_index = self.property_index.min(len.saturating_sub(1));
            }
        }
        self
    }

    /// Save the session: a draft in form mode, the template in template mode.
    ///
    pub fn save_designer(&mut self) -> &mut Self {
        let mode = match &self.designer {
            Some(designer) => designer.mode(),
            None => return self.set_error(StateError::DesignerNotOpen),
        };
        match mode {
            DesignerMode::Form => {
                let result = match &self.designer {
                    Some(designer) => designer.save_draft(self.draft_sink.as_ref()),
                    None => return self,
                };
                if let Some(receipt) = self.report(result) {
                    self.set_status(format!(
                        "Draft saved: {} field(s), {} bytes",
                        receipt.field_count, receipt.bytes
                    ));
                }
            }
            DesignerMode::Template => self.save_template(),
        }
        self
    }

    fn save_template(&mut self) {
        let (draft, editing) = match &self.designer {
            Some(designer) => (
                designer.template_draft(),
                designer.editing_template_id().map(str::to_string),
            ),
            None => return,
        };
        match editing {
            Some(id) => {
                let result = self.templates.update(&id, draft);
                if self.report(result).is_some() {
                    self.set_status("Template updated");
                }
            }
            None => {
                let result = self.templates.create(draft).map(|t| t.id.clone());
                if let Some(id) = self.report(result) {
                    if let Some(designer) = self.designer.as_mut() {
                        designer.mark_saved_template(id);
                    }
                    self.template_tab = TemplateTab::Custom;
                    self.set_status("Template created");
                }
            }
        }
    }

    /// Publish the form and open its channel screen.
    ///
    pub fn publish_designer(&mut self) -> &mut Self {
        let target = match &self.designer {
            Some(designer) if designer.mode() == DesignerMode::Form => designer.publish(),
            Some(_) => return self.set_status("Templates are saved, not published"),
            None => return self.set_error(StateError::DesignerNotOpen),
        };
        self.open_publish(target)
    }

    // Preview

    pub fn is_preview_open(&self) -> bool {
        self.current_view() == View::Designer
            && self
                .designer
                .as_ref()
                .map(|d| d.preview().is_some())
                .unwrap_or(false)
    }

    pub fn open_preview(&mut self) -> &mut Self {
        self.option_index = 0;
        self.with_designer(|designer| {
            designer.open_preview();
            Ok(())
        });
        self
    }

    pub fn close_preview(&mut self) -> &mut Self {
        if let Some(designer) = self.designer.as_mut() {
            designer.close_preview();
        }
        self
    }

    pub fn option_index(&self) -> usize {
        self.option_index
    }

    /// The field under the preview cursor.
    ///
    pub fn preview_focus(&self) -> Option<FieldInstance> {
        let designer = self.designer.as_ref()?;
        let cursor = designer.preview()?.cursor();
        designer.preview_fields().get(cursor).map(|f| (*f).clone())
    }

    pub fn navigate_preview(&mut self, forward: bool) -> &mut Self {
        if let Some(designer) = self.designer.as_mut() {
            let len = designer.preview_fields().len();
            if let Some(preview) = designer.preview_mut() {
                let cursor = step(preview.cursor(), len, forward);
                preview.set_cursor(cursor);
            }
        }
        self.option_index = 0;
        self
    }

    pub fn navigate_preview_option(&mut self, forward: bool) -> &mut Self {
        let len = self
            .preview_focus()
            .and_then(|f| f.config.options().map(|o| o.len()))
            .unwrap_or(0);
        self.option_index = step(self.option_index, len, forward);
        self
    }

    /// Enter on the focused preview field.
    ///
    pub fn activate_preview_field(&mut self) -> &mut Self {
        let field = match self.preview_focus() {
            Some(field) => field,
            None => return self,
        };
        let option = self.option_index;
        let id = field.id.clone();
        if let FieldConfig::Text(_)
        | FieldConfig::MultilineText(_)
        | FieldConfig::Number(_)
        | FieldConfig::Money(_)
        | FieldConfig::Date(_) = &field.config
        {
            let current = self
                .designer
                .as_ref()
                .and_then(|d| d.preview())
                .map(|p| p.fill().text(&id).to_string())
                .unwrap_or_default();
            return self.open_text_input(InputTarget::PreviewText(id), field.label, &current);
        }

        let mut notice = None;
        if let Some(preview) = self.designer.as_mut().and_then(|d| d.preview_mut()) {
            let fill = preview.fill_mut();
            match &field.config {
                FieldConfig::MultiChoice(_) => fill.toggle_option(&id, option),
                FieldConfig::SingleChoice(_) | FieldConfig::Dropdown(_) => {
                    fill.select_option(&id, option)
                }
                FieldConfig::FileUpload(config) => {
                    if !fill.add_file(&id, config.max_count) {
                        notice = Some(format!("At most {} file(s)", config.max_count));
                    }
                }
                FieldConfig::Signature(_) => fill.toggle_signed(&id),
                FieldConfig::SubTable(config) => {
                    if fill.add_row(&id, config.effective_max_rows()) == RowAppend::LimitReached {
                        notice = Some("Row limit reached".to_string());
                    }
                }
                _ => {}
            }
        }
        if let Some(notice) = notice {
            self.set_status(notice);
        }
        self
    }

    /// Clear the focused preview value, or drop the last sub-table row.
    ///
    pub fn clear_preview_field(&mut self) -> &mut Self {
        let field = match self.preview_focus() {
            Some(field) => field,
            None => return self,
        };
        if let Some(preview) = self.designer.as_mut().and_then(|d| d.preview_mut()) {
            let fill = preview.fill_mut();
            match &field.config {
                FieldConfig::FileUpload(_) => fill.clear_files(&field.id),
                FieldConfig::SubTable(_) => {
                    fill.remove_last_row(&field.id);
                }
                FieldConfig::Signature(_) if fill.is_signed(&field.id) => {
                    fill.toggle_signed(&field.id)
                }
                _ => fill.set_text(&field.id, String::new()),
            }
        }
        self
    }

    pub fn preview_advance(&mut self) -> &mut Self {
        let step = match self.designer.as_mut() {
            Some(designer) => designer.preview_advance(),
            None => None,
        };
        self.option_index = 0;
        match step {
            Some(PreviewStep::Invalid(count)) => {
                self.set_error(format!("{} field(s) need attention", count))
            }
            Some(PreviewStep::Submitted) => self.set_status("Submitted"),
            _ => self,
        }
    }

    pub fn preview_back(&mut self) -> &mut Self {
        if let Some(designer) = self.designer.as_mut() {
            designer.preview_back();
        }
        self.option_index = 0;
        self
    }

    // Template screen

    pub fn template_tab(&self) -> TemplateTab {
        self.template_tab
    }

    pub fn switch_template_tab(&mut self) -> &mut Self {
        self.template_tab = match self.template_tab {
            TemplateTab::System => TemplateTab::Custom,
            TemplateTab::Custom => TemplateTab::System,
        };
        self.template_index = 0;
        self
    }

    pub fn templates_in_tab(&self) -> Vec<&ComponentTemplate> {
        let kind = match self.template_tab {
            TemplateTab::System => TemplateKind::System,
            TemplateTab::Custom => TemplateKind::Custom,
        };
        self.templates.by_kind(kind)
    }

    pub fn template_index(&self) -> usize {
        self.template_index
    }

    pub fn navigate_templates(&mut self, forward: bool) -> &mut Self {
        let len = self.templates_in_tab().len();
        self.template_index = step(self.template_index, len, forward);
        self
    }

    pub fn selected_template(&self) -> Option<&ComponentTemplate> {
        self.templates_in_tab().get(self.template_index).copied()
    }

    pub fn is_template_preview(&self) -> bool {
        self.template_preview
    }

    pub fn toggle_template_preview(&mut self) -> &mut Self {
        self.template_preview = !self.template_preview;
        self
    }

    pub fn create_template(&mut self) -> &mut Self {
        self.open_designer(Designer::blank(DesignerMode::Template));
        self
    }

    /// Open the selected custom template in the designer.
    ///
    pub fn edit_selected_template(&mut self) -> &mut Self {
        let template = match self.selected_template() {
            Some(template) => template.clone(),
            None => return self.set_error(StateError::NoTemplateSelected),
        };
        if template.is_system() {
            return self.set_error(StateError::ReadOnlyTemplate(template.id));
        }
        self.open_designer(Designer::for_template(&template))
    }

    /// Ask to delete the selected template. System templates offer no delete.
    ///
    pub fn request_delete_template(&mut self) -> &mut Self {
        let confirmation = match self.selected_template() {
            Some(template) if !template.is_system() => Confirmation::DeleteTemplate {
                id: template.id.clone(),
                title: template.title.clone(),
            },
            Some(_) => return self,
            None => return self.set_error(StateError::NoTemplateSelected),
        };
        self.request_confirmation(confirmation)
    }

    // Publish screen

    pub fn open_publish(&mut self, target: PublishTarget) -> &mut Self {
        self.publish_target = Some(target);
        self.channel_index = 0;
        self.push_view(View::Publish)
    }

    pub fn publish_target(&self) -> Option<&PublishTarget> {
        self.publish_target.as_ref()
    }

    pub fn channels(&self) -> &ChannelStore {
        &self.channels
    }

    pub fn channel_index(&self) -> usize {
        self.channel_index
    }

    pub fn navigate_channels(&mut self, forward: bool) -> &mut Self {
        let len = self.channels.list_channels().len();
        self.channel_index = step(self.channel_index, len, forward);
        self
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.channels.list_channels().get(self.channel_index)
    }

    /// Share link of a channel for the published form.
    ///
    pub fn channel_link(&self, channel: &Channel) -> String {
        let form_id = self.publish_target.as_ref().and_then(|t| t.form_id.as_deref());
        share_link(&self.share_base_url, form_id, &channel.tag)
    }

    pub fn toggle_selected_channel(&mut self) -> &mut Self {
        let id = match self.selected_channel() {
            Some(channel) => channel.id.clone(),
            None => return self.set_error(StateError::NoChannelSelected),
        };
        let result = self.channels.toggle_channel(&id);
        self.report(result);
        self
    }

    pub fn start_channel_creation(&mut self) -> &mut Self {
        self.open_text_input(InputTarget::ChannelName, "New channel".to_string(), "")
    }

    /// Ask to delete the selected channel. System channels offer no delete.
    ///
    pub fn request_delete_channel(&mut self) -> &mut Self {
        let confirmation = match self.selected_channel() {
            Some(channel) if channel.is_system => {
                let error = ServiceError::SystemChannel(channel.id.clone());
                return self.set_error(error);
            }
            Some(channel) => Confirmation::DeleteChannel {
                id: channel.id.clone(),
                name: channel.name.clone(),
            },
            None => return self.set_error(StateError::NoChannelSelected),
        };
        self.request_confirmation(confirmation)
    }

    /// Show the submissions that came in through the selected channel.
    ///
    pub fn open_data_for_channel(&mut self) -> &mut Self {
        let channel = match self.selected_channel() {
            Some(channel) => channel.name.clone(),
            None => return self.set_error(StateError::NoChannelSelected),
        };
        let title = self.publish_target.as_ref().map(|t| t.form_title.clone());
        debug!("Opening submissions of channel '{}'", channel);
        self.open_analysis(
            title,
            SubmissionFilter {
                channel: Some(channel),
            },
        )
    }

    pub fn copy_selected_link(&mut self) -> &mut Self {
        let link = match self.selected_channel() {
            Some(channel) => self.channel_link(channel),
            None => return self.set_error(StateError::NoChannelSelected),
        };
        if self.report(copy_to_clipboard(&link)).is_some() {
            self.set_status(format!("Copied {}", link));
        }
        self
    }

    // Analysis screen

    pub fn submissions(&self) -> &SubmissionStore {
        &self.submissions
    }

    pub fn submission_filter(&self) -> &SubmissionFilter {
        &self.submission_filter
    }

    pub fn current_submission_page(&self) -> SubmissionPage {
        self.submissions
            .list_submissions(&self.submission_filter, self.submission_page, self.page_size)
    }

    /// Title of the analysed form: the one the screen was opened for, else
    /// the form named by the collected submissions.
    ///
    pub fn analysis_title(&self) -> String {
        if let Some(title) = &self.analysis_title {
            return title.clone();
        }
        self.submissions
            .list_submissions(&SubmissionFilter::default(), 1, 1)
            .rows
            .first()
            .map(|s| s.form_name.clone())
            .unwrap_or_else(|| "未命名表单".to_string())
    }

    pub fn analysis_report(&self) -> Option<&AnalysisReport> {
        self.analysis_report.as_ref()
    }

    pub fn open_report(&mut self) -> &mut Self {
        let generated_on = chrono::Local::now().format("%Y-%m-%d").to_string();
        let report = self.submissions.report(&self.analysis_title(), generated_on);
        self.analysis_report = Some(report);
        self
    }

    pub fn close_report(&mut self) -> &mut Self {
        self.analysis_report = None;
        self
    }

    pub fn submission_cursor(&self) -> usize {
        self.submission_cursor
    }

    /// Step the channel filter: all channels, then each channel in turn.
    ///
    pub fn cycle_submission_filter(&mut self) -> &mut Self {
        let names = self.submissions.channel_names();
        let next = match &self.submission_filter.channel {
            None => names.first().cloned(),
            Some(current) => names
                .iter()
                .position(|n| n == current)
                .and_then(|i| names.get(i + 1))
                .cloned(),
        };
        self.submission_filter = SubmissionFilter { channel: next };
        self.submission_page = 1;
        self.submission_cursor = 0;
        self
    }

    pub fn change_submission_page(&mut self, forward: bool) -> &mut Self {
        let page = self.current_submission_page();
        self.submission_page = if forward {
            (page.page + 1).min(page.page_count)
        } else {
            page.page.saturating_sub(1).max(1)
        };
        self.submission_cursor = 0;
        self
    }

    pub fn navigate_submissions(&mut self, forward: bool) -> &mut Self {
        let len = self.current_submission_page().rows.len();
        self.submission_cursor = step(self.submission_cursor, len, forward);
        self
    }

    pub fn is_submission_selected(&self, id: &str) -> bool {
        self.selected_submissions.contains(id)
    }

    pub fn selected_submission_count(&self) -> usize {
        self.selected_submissions.len()
    }

    pub fn toggle_submission(&mut self) -> &mut Self {
        let page = self.current_submission_page();
        if let Some(row) = page.rows.get(self.submission_cursor) {
            if !self.selected_submissions.remove(&row.id) {
                self.selected_submissions.insert(row.id.clone());
            }
        }
        self
    }

    /// Select every row of the page, or clear them when all are selected.
    ///
    pub fn toggle_all_submissions(&mut self) -> &mut Self {
        let ids: Vec<String> = self
            .current_submission_page()
            .rows
            .into_iter()
            .map(|r| r.id)
            .collect();
        if ids.iter().all(|id| self.selected_submissions.contains(id)) {
            for id in &ids {
                self.selected_submissions.remove(id);
            }
        } else {
            self.selected_submissions.extend(ids);
        }
        self
    }

    pub fn request_delete_submissions(&mut self) -> &mut Self {
        if self.selected_submissions.is_empty() {
            return self.set_status("Select rows with Space first");
        }
        let mut ids: Vec<String> = self.selected_submissions.iter().cloned().collect();
        ids.sort();
        self.request_confirmation(Confirmation::DeleteSubmissions(ids))
    }

    // Confirmation

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn request_confirmation(&mut self, confirmation: Confirmation) -> &mut Self {
        debug!("Awaiting confirmation: {}", confirmation.message());
        self.confirmation = Some(confirmation);
        self
    }

    pub fn cancel_confirmation(&mut self) -> &mut Self {
        self.confirmation = None;
        self
    }

    /// Carry out the pending destructive action.
    ///
    pub fn confirm(&mut self) -> &mut Self {
        let confirmation = match self.confirmation.take() {
            Some(confirmation) => confirmation,
            None => return self,
        };
        match confirmation {
            Confirmation::DeleteField { id, label } => {
                if self
                    .with_designer(|designer| Ok(designer.delete_field(&id)?))
                    .is_some()
                {
                    self.property_index = 0;
                    self.set_status(format!("Deleted {}", label));
                }
            }
            Confirmation::DeletePage { page, .. } => {
                if let Some(removed) =
                    self.with_designer(|designer| Ok(designer.delete_page(page)?))
                {
                    self.set_status(format!("Deleted page with {} field(s)", removed.len()));
                }
            }
            Confirmation::DeleteChannel { id, name } => {
                let result = self.channels.delete_channel(&id);
                if self.report(result).is_some() {
                    let len = self.channels.list_channels().len();
                    self.channel_index = self.channel_index.min(len.saturating_sub(1));
                    self.set_status(format!("Deleted channel {}", name));
                }
            }
            Confirmation::DeleteTemplate { id, title } => {
                let result = self.templates.delete(&id);
                if self.report(result).is_some() {
                    let len = self.templates_in_tab().len();
                    self.template_index = self.template_index.min(len.saturating_sub(1));
                    self.set_status(format!("Deleted template {}", title));
                }
            }
            Confirmation::DeleteSubmissions(ids) => {
                let removed = self.submissions.delete_submissions(&ids);
                for id in &ids {
                    self.selected_submissions.remove(id);
                }
                let page = self.current_submission_page();
                self.submission_page = page.page;
                self.submission_cursor = self
                    .submission_cursor
                    .min(page.rows.len().saturating_sub(1));
                self.set_status(format!("Deleted {} submission(s)", removed));
            }
        }
        self
    }

    // Text input

    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    pub fn text_input_mut(&mut self) -> Option<&mut TextInput> {
        self.text_input.as_mut()
    }

    pub fn open_text_input(&mut self, target: InputTarget, title: String, initial: &str) -> &mut Self {
        self.text_input = Some(TextInput::new(target, title, initial));
        self
    }

    pub fn cancel_text_input(&mut self) -> &mut Self {
        self.text_input = None;
        self
    }

    /// Apply the edited text to its target. A value the target rejects keeps
    /// the editor open.
    ///
    pub fn submit_text_input(&mut self) -> &mut Self {
        let input = match self.text_input.take() {
            Some(input) => input,
            None => return self,
        };
        let text = input.text();
        let applied = match &input.target {
            InputTarget::Property(control) => {
                let edit = control.commit(&text);
                self.with_designer(|designer| Ok(designer.update_selected(edit?)?))
                    .is_some()
            }
            InputTarget::Setting(control) => {
                if let Some(edit) = control.commit(&text) {
                    self.with_designer(|designer| {
                        designer.apply_setting(edit);
                        Ok(())
                    });
                }
                true
            }
            InputTarget::ChannelName => {
                let result = self
                    .channels
                    .create_channel(&text, generate_tag())
                    .map(|c| (c.name.clone(), c.tag.clone()));
                match self.report(result) {
                    Some((name, tag)) => {
                        self.channel_index = self.channels.list_channels().len() - 1;
                        self.set_status(format!("Created channel {} ({})", name, tag));
                        true
                    }
                    None => false,
                }
            }
            InputTarget::PreviewText(id) => {
                if let Some(preview) = self.designer.as_mut().and_then(|d| d.preview_mut()) {
                    preview.fill_mut().set_text(id, text);
                }
                true
            }
        };
        if !applied {
            self.text_input = Some(input);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::render::FieldBody;
    use crate::form::FieldKind;

    fn designer_state() -> State {
        let mut state = State::default();
        state.create_form();
        state
    }

    fn select_library_kind(state: &mut State, kind: FieldKind) {
        let index = state
            .library()
            .items()
            .position(|item| item.kind == kind)
            .unwrap();
        state.library_index = index;
        state.designer_pane = DesignerPane::Library;
        state.designer_select();
    }

    #[test]
    fn test_navigation_stack() {
        let mut state = State::default();
        assert_eq!(state.current_view(), View::Dashboard);
        state.jump_to(View::Forms);
        assert_eq!(state.menu_index(), 1);
        state.edit_selected_form();
        assert_eq!(state.current_view(), View::Designer);
        assert!(state.designer().is_some());
        state.back();
        assert_eq!(state.current_view(), View::Forms);
        assert!(state.designer().is_none());
        state.back();
        assert_eq!(state.current_focus(), Focus::Menu);
        state.next_menu().select_menu();
        assert_eq!(state.current_view(), View::Templates);
    }

    #[test]
    fn test_insert_from_library_selects_field() {
        let mut state = designer_state();
        select_library_kind(&mut state, FieldKind::Money);
        let designer = state.designer().unwrap();
        assert_eq!(designer.document().fields().len(), 2);
        assert_eq!(designer.selected_field().unwrap().kind(), FieldKind::Money);
        assert!(state.status().unwrap().text.contains("Added"));
    }

    #[test]
    fn test_insert_template_from_library_tab() {
        let mut state = designer_state();
        state.designer_pane = DesignerPane::Library;
        state.switch_designer_tab(true);
        assert_eq!(state.library_len(), state.templates().list().len());
        state.designer_select();
        // the first template contributes three fields
        assert_eq!(state.designer().unwrap().document().fields().len(), 4);
    }

    #[test]
    fn test_edit_max_length_through_panel() {
        let mut state = designer_state();
        state.navigate_designer(true);
        state.designer_select();
        assert_eq!(state.designer_pane(), DesignerPane::Properties);

        let index = state
            .panel_entries()
            .iter()
            .position(|e| *e == PanelEntry::Property(PropertyControl::MaxLength))
            .unwrap();
        state.property_index = index;
        state.activate_property();
        assert_eq!(state.text_input().unwrap().text(), "20");

        let input = state.text_input_mut().unwrap();
        input.delete_char();
        input.delete_char();
        input.insert_char('8');
        state.submit_text_input();
        assert!(state.text_input().is_none());

        let view = &state.designer().unwrap().canvas_views()[0];
        assert!(matches!(view.body, FieldBody::Text { max_length: 8, .. }));
    }

    #[test]
    fn test_rejected_text_keeps_editor_open() {
        let mut state = designer_state();
        state.navigate_designer(true);
        state.designer_pane = DesignerPane::Properties;
        let index = state
            .panel_entries()
            .iter()
            .position(|e| *e == PanelEntry::Property(PropertyControl::MaxLength))
            .unwrap();
        state.property_index = index;
        state.activate_property();
        state.text_input_mut().unwrap().insert_char('x');
        state.submit_text_input();
        assert!(state.text_input().is_some());
        assert_eq!(state.status().unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn test_delete_field_requires_confirmation() {
        let mut state = designer_state();
        state.navigate_designer(true);
        state.designer_delete();
        assert!(matches!(
            state.confirmation(),
            Some(Confirmation::DeleteField { .. })
        ));
        state.cancel_confirmation();
        assert_eq!(state.designer().unwrap().document().fields().len(), 1);

        state.designer_delete();
        state.confirm();
        assert!(state.designer().unwrap().document().fields().is_empty());
        assert!(state.confirmation().is_none());
    }

    #[test]
    fn test_last_page_is_refused_without_dialog() {
        let mut state = designer_state();
        state.request_delete_page();
        assert!(state.confirmation().is_none());
        assert_eq!(state.status().unwrap().level, StatusLevel::Error);

        state.add_page();
        state.request_delete_page();
        assert!(matches!(
            state.confirmation(),
            Some(Confirmation::DeletePage { position: 2, field_count: 0, .. })
        ));
        state.confirm();
        assert_eq!(state.designer().unwrap().document().pages().len(), 1);
    }

    #[test]
    fn test_sub_table_row_limit_on_canvas() {
        let mut state = designer_state();
        select_library_kind(&mut state, FieldKind::SubTable);
        state.designer_pane = DesignerPane::Canvas;
        for _ in 0..12 {
            state.add_canvas_row();
        }
        assert_eq!(state.status().unwrap().text, "Row limit reached");
        let id = state.selected_field_id().unwrap();
        let rows = state.designer().unwrap().canvas_rows(&id).unwrap();
        assert_eq!(rows.len(), 10);
    }

    #[test]
    fn test_toggle_pagination_setting() {
        let mut state = designer_state();
        state.open_document_settings();
        let index = state
            .panel_entries()
            .iter()
            .position(|e| *e == PanelEntry::Setting(SettingsControl::Pagination))
            .unwrap();
        state.property_index = index;
        let before = state.designer().unwrap().document().pagination_enabled();
        state.activate_property();
        assert_eq!(
            state.designer().unwrap().document().pagination_enabled(),
            !before
        );
    }

    #[test]
    fn test_save_draft_and_publish() {
        let mut state = designer_state();
        state.save_designer();
        assert!(state.status().unwrap().text.starts_with("Draft saved: 1 field(s)"));
        state.publish_designer();
        assert_eq!(state.current_view(), View::Publish);
        let target = state.publish_target().unwrap();
        assert_eq!(target.form_id, None);
        let channel = state.channels().list_channels()[0].clone();
        assert!(state.channel_link(&channel).contains("/F001?ch="));
    }

    #[test]
    fn test_template_save_creates_then_updates() {
        let mut state = State::default();
        state.jump_to(View::Templates);
        state.create_template();
        state.save_designer();
        assert_eq!(state.templates().by_kind(TemplateKind::Custom).len(), 2);
        state.save_designer();
        assert_eq!(state.templates().by_kind(TemplateKind::Custom).len(), 2);
        assert_eq!(state.status().unwrap().text, "Template updated");
    }

    #[test]
    fn test_system_templates_are_read_only() {
        let mut state = State::default();
        state.jump_to(View::Templates);
        assert_eq!(state.template_tab(), TemplateTab::System);
        state.request_delete_template();
        assert!(state.confirmation().is_none());
        state.edit_selected_template();
        assert_eq!(state.current_view(), View::Templates);

        state.switch_template_tab();
        state.request_delete_template();
        state.confirm();
        assert!(state.templates().by_kind(TemplateKind::Custom).is_empty());
    }

    #[test]
    fn test_channel_lifecycle() {
        let mut state = State::default();
        state.open_publish(PublishTarget {
            form_id: Some("F002".to_string()),
            form_title: "test".to_string(),
        });
        state.start_channel_creation();
        for c in "食堂海报".chars() {
            state.text_input_mut().unwrap().insert_char(c);
        }
        state.submit_text_input();
        assert_eq!(state.channels().list_channels().len(), 4);
        let created = state.selected_channel().unwrap().clone();
        assert_eq!(created.name, "食堂海报");
        assert!(state.channel_link(&created).contains("/F002?ch=ch_"));

        state.request_delete_channel();
        state.confirm();
        assert_eq!(state.channels().list_channels().len(), 3);

        state.channel_index = 0;
        state.request_delete_channel();
        assert!(state.confirmation().is_none());
    }

    #[test]
    fn test_empty_channel_name_keeps_editor() {
        let mut state = State::default();
        state.start_channel_creation();
        state.submit_text_input();
        assert!(state.text_input().is_some());
        assert_eq!(state.channels().list_channels().len(), 3);
    }

    #[test]
    fn test_submission_selection_and_delete() {
        let mut state = State::default();
        state.page_size = 4;
        state.jump_to(View::Analysis);
        state.toggle_all_submissions();
        assert_eq!(state.selected_submission_count(), 4);
        state.change_submission_page(true);
        assert_eq!(state.current_submission_page().page, 2);
        state.toggle_submission();
        state.request_delete_submissions();
        state.confirm();
        assert_eq!(state.submissions().len(), 1);
        assert_eq!(state.selected_submission_count(), 0);
        assert_eq!(state.current_submission_page().page, 1);
    }

    #[test]
    fn test_filter_cycles_back_to_all() {
        let mut state = State::default();
        let channels = state.submissions().channel_names().len();
        for _ in 0..channels {
            state.cycle_submission_filter();
            assert!(state.submission_filter().channel.is_some());
        }
        state.cycle_submission_filter();
        assert_eq!(state.submission_filter().channel, None);
    }

    #[test]
    fn test_channel_data_is_filtered_by_channel() {
        let mut state = State::default();
        state.open_publish(PublishTarget {
            form_id: Some("F001".to_string()),
            form_title: "秋季助学金申请表".to_string(),
        });
        state.navigate_channels(true);
        state.open_data_for_channel();
        assert_eq!(state.current_view(), View::Analysis);
        assert_eq!(
            state.submission_filter().channel.as_deref(),
            Some("调查问卷 (公共链接)")
        );
        assert_eq!(state.current_submission_page().total, 1);
        assert_eq!(state.analysis_title(), "秋季助学金申请表");

        state.back();
        assert_eq!(state.current_view(), View::Publish);
    }

    #[test]
    fn test_report_toggle() {
        let mut state = State::default();
        state.jump_to(View::Forms);
        state.navigate_forms(true);
        state.open_data_for_selected();
        assert!(state.analysis_report().is_none());

        state.open_report();
        let report = state.analysis_report().unwrap();
        assert_eq!(report.form_title, "临时困难救助登记");
        assert_eq!(report.metrics.completion_rate, "33.6%");
        assert!(!report.conclusions.is_empty());

        state.close_report();
        assert!(state.analysis_report().is_none());
    }

    #[test]
    fn test_analysis_title_falls_back_to_submissions() {
        let state = State::default();
        assert_eq!(state.analysis_title(), "秋季助学金申请表");
    }

    #[test]
    fn test_preview_fill_and_submit() {
        let mut state = State::default();
        state.jump_to(View::Forms);
        state.create_form();
        state.open_preview();
        assert!(state.is_preview_open());

        state.preview_advance();
        assert_eq!(state.status().unwrap().level, StatusLevel::Error);

        state.activate_preview_field();
        for c in "王晓明".chars() {
            state.text_input_mut().unwrap().insert_char(c);
        }
        state.submit_text_input();
        state.preview_advance();
        assert_eq!(state.status().unwrap().text, "Submitted");
        assert!(state.designer().unwrap().preview().unwrap().is_submitted());
    }

    #[test]
    fn test_theme_cycles() {
        let mut state = State::default();
        let first = state.get_theme().name.clone();
        state.cycle_theme();
        assert_ne!(state.get_theme().name, first);
    }

    #[test]
    fn test_tick_drains_log_buffer() {
        let buffer: LogBuffer = Default::default();
        let (tx, _rx) = std::sync::mpsc::channel();
        let mut state = State::new(&Config::new(), tx, buffer.clone());
        buffer.lock().unwrap().push("line".to_string());
        state.tick();
        assert_eq!(state.get_debug_entries(), ["line".to_string()]);
        assert!(buffer.lock().unwrap().is_empty());
    }
}
