//! Property edits applied to a field configuration.
//!
//! Every property panel control produces a `FieldPatch`; the document applies
//! it to the selected field's configuration. Patches that do not fit the
//! field's kind are refused instead of being silently stored.

use super::error::FormError;
use super::schema::{ColumnKind, DateFormat, FieldConfig, FileType, SubTableColumn};
use super::schema::{MAX_UPLOAD_COUNT, MAX_UPLOAD_SIZE_MB};
use super::subtable::MAX_ROWS_LIMIT;

/// Longest text limit the panel accepts.
const MAX_TEXT_LIMIT: u32 = 10_000;

/// Tallest multi-line input the panel accepts.
const MAX_TEXTAREA_ROWS: u32 = 20;

/// A single property edit.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    SetPlaceholder(String),
    SetRequired(bool),
    SetDescription(Option<String>),
    SetMaxLength(u32),
    SetRows(u16),
    SetUnit(String),
    SetCurrency(String),
    SetShowThousands(bool),
    SetDateFormat(DateFormat),
    ToggleFileType(FileType),
    SetMaxSize(u32),
    SetMaxCount(u32),
    AddOption,
    RemoveOption(usize),
    RenameOption(usize, String),
    SetMaxRows(u32),
    AddColumn(ColumnKind),
    RemoveColumn(String),
    RenameColumn(String, String),
}

impl FieldPatch {
    /// Return the property name the patch edits.
    ///
    pub fn property(&self) -> &'static str {
        match self {
            FieldPatch::SetPlaceholder(_) => "placeholder",
            FieldPatch::SetRequired(_) => "required",
            FieldPatch::SetDescription(_) => "description",
            FieldPatch::SetMaxLength(_) => "max length",
            FieldPatch::SetRows(_) => "rows",
            FieldPatch::SetUnit(_) => "unit",
            FieldPatch::SetCurrency(_) => "currency",
            FieldPatch::SetShowThousands(_) => "thousands separator",
            FieldPatch::SetDateFormat(_) => "date format",
            FieldPatch::ToggleFileType(_) => "file types",
            FieldPatch::SetMaxSize(_) => "max size",
            FieldPatch::SetMaxCount(_) => "max count",
            FieldPatch::AddOption
            | FieldPatch::RemoveOption(_)
            | FieldPatch::RenameOption(_, _) => "options",
            FieldPatch::SetMaxRows(_) => "max rows",
            FieldPatch::AddColumn(_)
            | FieldPatch::RemoveColumn(_)
            | FieldPatch::RenameColumn(_, _) => "columns",
        }
    }
}

fn check_range(property: &'static str, value: u32, min: u32, max: u32) -> Result<u32, FormError> {
    if value < min || value > max {
        return Err(FormError::ValueOutOfRange {
            property,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

impl FieldConfig {
    /// Apply a property edit in place. `next_column_id` is only called when a
    /// column is added. On error the configuration is left untouched.
    ///
    pub fn apply<F>(&mut self, patch: FieldPatch, next_column_id: F) -> Result<(), FormError>
    where
        F: FnOnce() -> String,
    {
        let kind = self.kind();
        let property = patch.property();
        let not_applicable = || FormError::PatchNotApplicable { kind, property };

        match patch {
            FieldPatch::SetRequired(required) => {
                self.common_mut().required = required;
            }
            FieldPatch::SetDescription(description) => {
                self.common_mut().description = description.filter(|d| !d.trim().is_empty());
            }
            FieldPatch::SetPlaceholder(placeholder) => {
                if !kind.has_placeholder() {
                    return Err(not_applicable());
                }
                self.common_mut().placeholder = Some(placeholder);
            }
            FieldPatch::SetMaxLength(value) => {
                let value = check_range(property, value, 1, MAX_TEXT_LIMIT)?;
                match self {
                    FieldConfig::Text(c) => c.max_length = Some(value),
                    FieldConfig::MultilineText(c) => c.max_length = Some(value),
                    _ => return Err(not_applicable()),
                }
            }
            FieldPatch::SetRows(rows) => match self {
                FieldConfig::MultilineText(c) => {
                    check_range(property, rows as u32, 1, MAX_TEXTAREA_ROWS)?;
                    c.rows = rows;
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetUnit(unit) => match self {
                FieldConfig::Number(c) => c.unit = unit,
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetCurrency(currency) => match self {
                FieldConfig::Money(c) => c.currency = currency,
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetShowThousands(show) => match self {
                FieldConfig::Money(c) => c.show_thousands = show,
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetDateFormat(format) => match self {
                FieldConfig::Date(c) => c.format = format,
                _ => return Err(not_applicable()),
            },
            FieldPatch::ToggleFileType(file_type) => match self {
                FieldConfig::FileUpload(c) => {
                    if let Some(pos) = c.file_types.iter().position(|t| *t == file_type) {
                        c.file_types.remove(pos);
                    } else {
                        c.file_types.push(file_type);
                    }
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetMaxSize(value) => match self {
                FieldConfig::FileUpload(c) => {
                    c.max_size_mb = check_range(property, value, 1, MAX_UPLOAD_SIZE_MB)?;
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetMaxCount(value) => match self {
                FieldConfig::FileUpload(c) => {
                    c.max_count = check_range(property, value, 1, MAX_UPLOAD_COUNT)?;
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::AddOption => match self {
                FieldConfig::SingleChoice(c)
                | FieldConfig::MultiChoice(c)
                | FieldConfig::Dropdown(c) => {
                    let label = format!("选项{}", c.options.len() + 1);
                    c.options.push(label);
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::RemoveOption(index) => match self {
                FieldConfig::SingleChoice(c)
                | FieldConfig::MultiChoice(c)
                | FieldConfig::Dropdown(c) => {
                    if index >= c.options.len() {
                        return Err(FormError::OptionNotFound { index });
                    }
                    c.options.remove(index);
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::RenameOption(index, label) => match self {
                FieldConfig::SingleChoice(c)
                | FieldConfig::MultiChoice(c)
                | FieldConfig::Dropdown(c) => {
                    let option = c
                        .options
                        .get_mut(index)
                        .ok_or(FormError::OptionNotFound { index })?;
                    *option = label;
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::SetMaxRows(value) => match self {
                FieldConfig::SubTable(c) => {
                    c.max_rows = Some(check_range(property, value, 1, MAX_ROWS_LIMIT)?);
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::AddColumn(column_kind) => match self {
                FieldConfig::SubTable(c) => {
                    let id = next_column_id();
                    c.columns.push(SubTableColumn::new(
                        &id,
                        column_kind,
                        column_kind.default_label(),
                    ));
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::RemoveColumn(id) => match self {
                FieldConfig::SubTable(c) => {
                    if !c.remove_column(&id) {
                        return Err(FormError::ColumnNotFound(id));
                    }
                }
                _ => return Err(not_applicable()),
            },
            FieldPatch::RenameColumn(id, label) => match self {
                FieldConfig::SubTable(c) => {
                    if !c.rename_column(&id, label) {
                        return Err(FormError::ColumnNotFound(id));
                    }
                }
                _ => return Err(not_applicable()),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::schema::FieldKind;

    fn no_column_id() -> String {
        panic!("column id requested for a non-column patch")
    }

    #[test]
    fn test_set_max_length_on_text() {
        let mut config = FieldKind::Text.default_config();
        config.apply(FieldPatch::SetMaxLength(20), no_column_id).unwrap();
        match config {
            FieldConfig::Text(c) => assert_eq!(c.max_length, Some(20)),
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_patch_not_applicable_leaves_config_unchanged() {
        let mut config = FieldKind::Signature.default_config();
        let before = config.clone();
        let result = config.apply(FieldPatch::AddOption, no_column_id);
        assert_eq!(
            result,
            Err(FormError::PatchNotApplicable {
                kind: FieldKind::Signature,
                property: "options",
            })
        );
        assert_eq!(config, before);

        let result = config.apply(FieldPatch::SetPlaceholder("x".to_string()), no_column_id);
        assert!(matches!(result, Err(FormError::PatchNotApplicable { .. })));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = FieldKind::FileUpload.default_config();
        let before = config.clone();
        assert!(matches!(
            config.apply(FieldPatch::SetMaxSize(500), no_column_id),
            Err(FormError::ValueOutOfRange { max: 200, .. })
        ));
        assert!(matches!(
            config.apply(FieldPatch::SetMaxCount(0), no_column_id),
            Err(FormError::ValueOutOfRange { min: 1, .. })
        ));
        assert_eq!(config, before);

        let mut config = FieldKind::SubTable.default_config();
        assert!(config.apply(FieldPatch::SetMaxRows(21), no_column_id).is_err());
        config.apply(FieldPatch::SetMaxRows(20), no_column_id).unwrap();
        assert_eq!(config.as_sub_table().unwrap().max_rows, Some(20));
    }

    #[test]
    fn test_toggle_file_type() {
        let mut config = FieldKind::FileUpload.default_config();
        config
            .apply(FieldPatch::ToggleFileType(FileType::Zip), no_column_id)
            .unwrap();
        config
            .apply(FieldPatch::ToggleFileType(FileType::Image), no_column_id)
            .unwrap();
        match config {
            FieldConfig::FileUpload(c) => {
                assert_eq!(c.file_types, vec![FileType::Doc, FileType::Zip]);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_option_editing() {
        let mut config = FieldKind::SingleChoice.default_config();
        config.apply(FieldPatch::AddOption, no_column_id).unwrap();
        config
            .apply(FieldPatch::RenameOption(0, "是".to_string()), no_column_id)
            .unwrap();
        config.apply(FieldPatch::RemoveOption(1), no_column_id).unwrap();
        assert_eq!(
            config.options().unwrap(),
            &["是".to_string(), "选项3".to_string()]
        );
        assert_eq!(
            config.apply(FieldPatch::RemoveOption(5), no_column_id),
            Err(FormError::OptionNotFound { index: 5 })
        );
    }

    #[test]
    fn test_column_editing() {
        let mut config = FieldKind::SubTable.default_config();
        config
            .apply(FieldPatch::AddColumn(ColumnKind::Date), || "col_7".to_string())
            .unwrap();
        config
            .apply(
                FieldPatch::RenameColumn("c1".to_string(), "名称".to_string()),
                no_column_id,
            )
            .unwrap();
        config
            .apply(FieldPatch::RemoveColumn("c2".to_string()), no_column_id)
            .unwrap();

        let table = config.as_sub_table().unwrap();
        let labels: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["名称", "新日期列"]);
        assert_eq!(table.columns[1].id, "col_7");
        assert_eq!(table.columns[1].kind, ColumnKind::Date);

        assert_eq!(
            config.apply(FieldPatch::RemoveColumn("missing".to_string()), no_column_id),
            Err(FormError::ColumnNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_description_blank_clears() {
        let mut config = FieldKind::Number.default_config();
        config
            .apply(
                FieldPatch::SetDescription(Some("单位：元".to_string())),
                no_column_id,
            )
            .unwrap();
        assert_eq!(config.common().description.as_deref(), Some("单位：元"));
        config
            .apply(FieldPatch::SetDescription(Some("  ".to_string())), no_column_id)
            .unwrap();
        assert_eq!(config.common().description, None);
    }
}
