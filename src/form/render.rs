//! Field rendering model.
//!
//! `render_field` turns a field instance into a `FieldView`, a plain
//! description of what to draw. The kind-specific body comes from one
//! function, `field_body`, which never looks at the render mode; the mode only
//! decides the surrounding chrome and whether native inputs are interactive.
//! The terminal widgets in `ui::render::field` draw a `FieldView` the same way
//! for the design canvas and the preview.

use super::document::{FieldId, FieldInstance};
use super::schema::{ColumnKind, FieldConfig, FieldKind};
use super::subtable::{RowId, SubTableRows};

/// Message shown by a sub-table without rows.
pub const EMPTY_ROWS_MESSAGE: &str = "暂无明细，请添加";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Design,
    Fill,
}

/// Per-instance inputs to rendering that are not part of the field itself.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub selected: bool,
    pub rows: Option<&'a SubTableRows>,
}

/// Editing affordances drawn around a field on the design canvas.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignChrome {
    pub selected: bool,
    pub delete_affordance: bool,
    pub drag_handle: bool,
    pub kind_badge: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Radio,
    Checkbox,
}

/// Add-row control of a sub-table.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRowControl {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub label: String,
    pub kind: ColumnKind,
}

/// Rendered sub-table: header, rows and live row controls.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTableView {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RowId>,
    pub empty_message: Option<&'static str>,
    pub add_control: AddRowControl,
    pub max_rows: u32,
}

/// Kind-specific body of a rendered field.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldBody {
    Text {
        placeholder: String,
        max_length: u32,
    },
    TextArea {
        placeholder: String,
        rows: u16,
        max_length: u32,
    },
    Number {
        placeholder: String,
        unit: Option<String>,
    },
    Money {
        placeholder: String,
        currency: String,
        thousands: bool,
    },
    Choice {
        style: ChoiceStyle,
        options: Vec<String>,
    },
    Dropdown {
        placeholder: String,
        options: Vec<String>,
    },
    Date {
        placeholder: String,
        hint: &'static str,
    },
    Upload {
        placeholder: String,
        accepted: Vec<&'static str>,
        max_size_mb: u32,
        max_count: u32,
    },
    Signature {
        prompt: &'static str,
    },
    SubTable(SubTableView),
}

/// Everything needed to draw one field.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub id: FieldId,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    pub description: Option<String>,
    pub body: FieldBody,
    pub chrome: Option<DesignChrome>,
    pub inputs_enabled: bool,
}

impl FieldView {
    /// Whether the sub-table row controls accept input. They stay live in
    /// both modes.
    ///
    pub fn row_controls_live(&self) -> bool {
        matches!(self.body, FieldBody::SubTable(_))
    }
}

/// Render a field for the given mode.
///
pub fn render_field(instance: &FieldInstance, mode: RenderMode, ctx: RenderContext<'_>) -> FieldView {
    let chrome = match mode {
        RenderMode::Design => Some(DesignChrome {
            selected: ctx.selected,
            delete_affordance: ctx.selected,
            drag_handle: true,
            kind_badge: instance.kind().display_name(),
        }),
        RenderMode::Fill => None,
    };
    FieldView {
        id: instance.id.clone(),
        kind: instance.kind(),
        label: instance.label.clone(),
        required: instance.config.required(),
        description: instance.config.common().description.clone(),
        body: field_body(&instance.config, ctx.rows),
        chrome,
        inputs_enabled: mode == RenderMode::Fill,
    }
}

/// Build the kind-specific body. Shared by every render mode.
///
pub fn field_body(config: &FieldConfig, rows: Option<&SubTableRows>) -> FieldBody {
    let placeholder = config.placeholder().unwrap_or_default().to_string();
    match config {
        FieldConfig::Text(c) => FieldBody::Text {
            placeholder,
            max_length: c.effective_max_length(),
        },
        FieldConfig::MultilineText(c) => FieldBody::TextArea {
            placeholder,
            rows: c.rows,
            max_length: c.effective_max_length(),
        },
        FieldConfig::Number(c) => FieldBody::Number {
            placeholder,
            unit: Some(c.unit.clone()).filter(|u| !u.is_empty()),
        },
        FieldConfig::Money(c) => FieldBody::Money {
            placeholder,
            currency: c.currency.clone(),
            thousands: c.show_thousands,
        },
        FieldConfig::SingleChoice(c) => FieldBody::Choice {
            style: ChoiceStyle::Radio,
            options: c.options.clone(),
        },
        FieldConfig::MultiChoice(c) => FieldBody::Choice {
            style: ChoiceStyle::Checkbox,
            options: c.options.clone(),
        },
        FieldConfig::Dropdown(c) => FieldBody::Dropdown {
            placeholder,
            options: c.options.clone(),
        },
        FieldConfig::Date(c) => FieldBody::Date {
            placeholder,
            hint: c.format.hint(),
        },
        FieldConfig::FileUpload(c) => FieldBody::Upload {
            placeholder,
            accepted: c.file_types.iter().map(|t| t.label()).collect(),
            max_size_mb: c.max_size_mb,
            max_count: c.max_count,
        },
        FieldConfig::Signature(_) => FieldBody::Signature {
            prompt: "点击此处签名",
        },
        FieldConfig::SubTable(c) => {
            let default_rows = SubTableRows::new();
            let rows = rows.unwrap_or(&default_rows);
            let max_rows = c.effective_max_rows();
            let enabled = rows.can_add(max_rows);
            let label = if enabled {
                "+ 添加一条记录".to_string()
            } else {
                format!("+ 添加一条记录 (上限{}条)", max_rows)
            };
            FieldBody::SubTable(SubTableView {
                columns: c
                    .columns
                    .iter()
                    .map(|col| ColumnHeader {
                        label: col.label.clone(),
                        kind: col.kind,
                    })
                    .collect(),
                rows: rows.rows().to_vec(),
                empty_message: if rows.is_empty() {
                    Some(EMPTY_ROWS_MESSAGE)
                } else {
                    None
                },
                add_control: AddRowControl { label, enabled },
                max_rows,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::designer::DesignerMode;
    use crate::form::document::{FormDocument, InsertSource};
    use crate::form::patch::FieldPatch;

    fn document_with_every_kind() -> FormDocument {
        let mut document = FormDocument::empty(DesignerMode::Form);
        for kind in FieldKind::ALL {
            document.insert_field(InsertSource::Kind(kind), 1).unwrap();
        }
        document
    }

    #[test]
    fn test_design_and_fill_share_body() {
        let document = document_with_every_kind();
        let rows = SubTableRows::new();
        for field in document.fields() {
            let ctx = RenderContext {
                selected: true,
                rows: Some(&rows),
            };
            let design = render_field(field, RenderMode::Design, ctx);
            let fill = render_field(field, RenderMode::Fill, ctx);
            assert_eq!(design.body, fill.body, "body mismatch for {}", field.kind());
            assert_eq!(design.label, fill.label);
            assert_eq!(design.required, fill.required);
        }
    }

    #[test]
    fn test_mode_controls_chrome_and_inputs() {
        let document = document_with_every_kind();
        let field = &document.fields()[0];
        let design = render_field(field, RenderMode::Design, RenderContext::default());
        assert!(!design.inputs_enabled);
        let chrome = design.chrome.unwrap();
        assert!(chrome.drag_handle);
        assert!(!chrome.delete_affordance);

        let fill = render_field(field, RenderMode::Fill, RenderContext::default());
        assert!(fill.inputs_enabled);
        assert!(fill.chrome.is_none());
    }

    #[test]
    fn test_sub_table_controls_live_in_design_mode() {
        let document = document_with_every_kind();
        let table = document
            .fields()
            .iter()
            .find(|f| f.kind() == FieldKind::SubTable)
            .unwrap();
        let view = render_field(table, RenderMode::Design, RenderContext::default());
        assert!(view.row_controls_live());
        match view.body {
            FieldBody::SubTable(sub) => {
                assert!(sub.add_control.enabled);
                assert_eq!(sub.rows.len(), 1);
                assert_eq!(sub.columns.len(), 2);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_sub_table_limit_disables_add_control() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let ids = document
            .insert_field(InsertSource::Kind(FieldKind::SubTable), 1)
            .unwrap();
        document
            .update_field_config(&ids[0], FieldPatch::SetMaxRows(3))
            .unwrap();
        let field = document.field(&ids[0]).unwrap();

        let mut rows = SubTableRows::new();
        rows.add_row(3);
        rows.add_row(3);
        let view = render_field(
            field,
            RenderMode::Fill,
            RenderContext {
                selected: false,
                rows: Some(&rows),
            },
        );
        match view.body {
            FieldBody::SubTable(sub) => {
                assert!(!sub.add_control.enabled);
                assert!(sub.add_control.label.contains("(上限3条)"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_empty_sub_table_shows_message() {
        let config = FieldKind::SubTable.default_config();
        let rows = SubTableRows::empty();
        match field_body(&config, Some(&rows)) {
            FieldBody::SubTable(sub) => {
                assert!(sub.rows.is_empty());
                assert_eq!(sub.empty_message, Some(EMPTY_ROWS_MESSAGE));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_body_reflects_config_edits() {
        let mut document = FormDocument::empty(DesignerMode::Form);
        let ids = document
            .insert_field(InsertSource::Kind(FieldKind::Number), 1)
            .unwrap();
        document
            .update_field_config(&ids[0], FieldPatch::SetUnit("元".to_string()))
            .unwrap();
        let field = document.field(&ids[0]).unwrap();
        assert_eq!(
            field_body(&field.config, None),
            FieldBody::Number {
                placeholder: "0".to_string(),
                unit: Some("元".to_string()),
            }
        );
    }
}
