//! Field schema.
//!
//! Defines the closed set of field kinds a form can contain and the strongly
//! typed configuration record each kind carries. The configuration is a sum
//! type keyed by kind so renderers and property panels match on the variant
//! instead of probing optional properties.

use serde::Serialize;
use std::fmt;

/// Effective maximum length of a single-line text field without an explicit limit.
pub const DEFAULT_TEXT_MAX_LENGTH: u32 = 100;

/// Effective maximum length of a multi-line text field without an explicit limit.
pub const DEFAULT_TEXTAREA_MAX_LENGTH: u32 = 255;

/// Upper bound accepted for the upload size limit (MB).
pub const MAX_UPLOAD_SIZE_MB: u32 = 200;

/// Upper bound accepted for the upload file count.
pub const MAX_UPLOAD_COUNT: u32 = 9;

/// Specifying the different field kinds.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    MultilineText,
    Number,
    Money,
    SingleChoice,
    MultiChoice,
    Dropdown,
    Date,
    FileUpload,
    Signature,
    SubTable,
}

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Text,
        FieldKind::MultilineText,
        FieldKind::Number,
        FieldKind::Money,
        FieldKind::SingleChoice,
        FieldKind::MultiChoice,
        FieldKind::Dropdown,
        FieldKind::Date,
        FieldKind::FileUpload,
        FieldKind::Signature,
        FieldKind::SubTable,
    ];

    /// Return the stable identifier of the kind.
    ///
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::MultilineText => "multiline-text",
            FieldKind::Number => "number",
            FieldKind::Money => "money",
            FieldKind::SingleChoice => "single-choice",
            FieldKind::MultiChoice => "multi-choice",
            FieldKind::Dropdown => "dropdown",
            FieldKind::Date => "date",
            FieldKind::FileUpload => "file-upload",
            FieldKind::Signature => "signature",
            FieldKind::SubTable => "sub-table",
        }
    }

    /// Return the label shown in the component library.
    ///
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "单行文本",
            FieldKind::MultilineText => "多行文本",
            FieldKind::Number => "数字输入",
            FieldKind::Money => "金额输入",
            FieldKind::SingleChoice => "单选框",
            FieldKind::MultiChoice => "多选框",
            FieldKind::Dropdown => "下拉选择",
            FieldKind::Date => "日期时间",
            FieldKind::FileUpload => "文件上传",
            FieldKind::Signature => "手写签名",
            FieldKind::SubTable => "动态子表单",
        }
    }

    /// Whether the kind carries an option list.
    ///
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldKind::SingleChoice | FieldKind::MultiChoice | FieldKind::Dropdown
        )
    }

    /// Whether the kind renders a placeholder text.
    ///
    pub fn has_placeholder(&self) -> bool {
        !matches!(
            self,
            FieldKind::SingleChoice
                | FieldKind::MultiChoice
                | FieldKind::Signature
                | FieldKind::SubTable
        )
    }

    /// Return the library default configuration for the kind.
    ///
    pub fn default_config(&self) -> FieldConfig {
        match self {
            FieldKind::Text => FieldConfig::Text(TextConfig {
                common: CommonProps::with_placeholder("请输入"),
                max_length: Some(DEFAULT_TEXT_MAX_LENGTH),
            }),
            FieldKind::MultilineText => FieldConfig::MultilineText(TextAreaConfig {
                common: CommonProps::with_placeholder("请输入详细内容"),
                rows: 3,
                max_length: Some(DEFAULT_TEXTAREA_MAX_LENGTH),
            }),
            FieldKind::Number => FieldConfig::Number(NumberConfig {
                common: CommonProps::with_placeholder("0"),
                unit: String::new(),
            }),
            FieldKind::Money => FieldConfig::Money(MoneyConfig {
                common: CommonProps::with_placeholder("0.00"),
                currency: "¥".to_string(),
                show_thousands: true,
            }),
            FieldKind::SingleChoice => FieldConfig::SingleChoice(ChoiceConfig {
                common: CommonProps::default(),
                options: numbered_options(2),
            }),
            FieldKind::MultiChoice => FieldConfig::MultiChoice(ChoiceConfig {
                common: CommonProps::default(),
                options: numbered_options(3),
            }),
            FieldKind::Dropdown => FieldConfig::Dropdown(ChoiceConfig {
                common: CommonProps::with_placeholder("请选择"),
                options: numbered_options(2),
            }),
            FieldKind::Date => FieldConfig::Date(DateConfig {
                common: CommonProps::with_placeholder("请选择日期"),
                format: DateFormat::Date,
            }),
            FieldKind::FileUpload => FieldConfig::FileUpload(UploadConfig {
                common: CommonProps::with_placeholder("点击或拖拽上传"),
                file_types: vec![FileType::Image, FileType::Doc],
                max_size_mb: 10,
                max_count: 3,
            }),
            FieldKind::Signature => FieldConfig::Signature(SignatureConfig {
                common: CommonProps {
                    required: true,
                    ..CommonProps::default()
                },
            }),
            FieldKind::SubTable => FieldConfig::SubTable(SubTableConfig {
                common: CommonProps::default(),
                columns: vec![
                    SubTableColumn::new("c1", ColumnKind::Text, "项目名称"),
                    SubTableColumn::new("c2", ColumnKind::Number, "数量"),
                ],
                max_rows: Some(crate::form::subtable::DEFAULT_MAX_ROWS),
            }),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn numbered_options(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("选项{}", i)).collect()
}

/// Properties shared by every field kind.
///
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CommonProps {
    pub placeholder: Option<String>,
    pub required: bool,
    pub description: Option<String>,
}

impl CommonProps {
    pub fn with_placeholder(placeholder: &str) -> Self {
        CommonProps {
            placeholder: Some(placeholder.to_string()),
            ..CommonProps::default()
        }
    }

    pub fn required() -> Self {
        CommonProps {
            required: true,
            ..CommonProps::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextConfig {
    pub common: CommonProps,
    pub max_length: Option<u32>,
}

impl TextConfig {
    pub fn effective_max_length(&self) -> u32 {
        self.max_length.unwrap_or(DEFAULT_TEXT_MAX_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAreaConfig {
    pub common: CommonProps,
    pub rows: u16,
    pub max_length: Option<u32>,
}

impl TextAreaConfig {
    pub fn effective_max_length(&self) -> u32 {
        self.max_length.unwrap_or(DEFAULT_TEXTAREA_MAX_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberConfig {
    pub common: CommonProps,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyConfig {
    pub common: CommonProps,
    pub currency: String,
    pub show_thousands: bool,
}

/// Shared by single-choice, multi-choice and dropdown fields.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceConfig {
    pub common: CommonProps,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateConfig {
    pub common: CommonProps,
    pub format: DateFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadConfig {
    pub common: CommonProps,
    pub file_types: Vec<FileType>,
    pub max_size_mb: u32,
    pub max_count: u32,
}

impl UploadConfig {
    pub fn accepts(&self, file_type: FileType) -> bool {
        self.file_types.contains(&file_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureConfig {
    pub common: CommonProps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubTableConfig {
    pub common: CommonProps,
    pub columns: Vec<SubTableColumn>,
    pub max_rows: Option<u32>,
}

/// Date picker granularity.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    Date,
    DateTime,
}

impl DateFormat {
    /// Return the input hint rendered inside the picker.
    ///
    pub fn hint(&self) -> &'static str {
        match self {
            DateFormat::Date => "YYYY-MM-DD",
            DateFormat::DateTime => "YYYY-MM-DD HH:mm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::Date => "年月日",
            DateFormat::DateTime => "日期+时间",
        }
    }

    pub fn toggled(&self) -> DateFormat {
        match self {
            DateFormat::Date => DateFormat::DateTime,
            DateFormat::DateTime => DateFormat::Date,
        }
    }
}

/// File categories an upload field can accept.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Image,
    Doc,
    Zip,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Image, FileType::Doc, FileType::Zip];

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Image => "图片",
            FileType::Doc => "文档",
            FileType::Zip => "压缩包",
        }
    }
}

/// Input kinds available to sub-table columns.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Dropdown,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 4] = [
        ColumnKind::Text,
        ColumnKind::Number,
        ColumnKind::Date,
        ColumnKind::Dropdown,
    ];

    /// Return the label given to a freshly added column.
    ///
    pub fn default_label(&self) -> &'static str {
        match self {
            ColumnKind::Text => "新文本列",
            ColumnKind::Number => "新数字列",
            ColumnKind::Date => "新日期列",
            ColumnKind::Dropdown => "新下拉列",
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            ColumnKind::Text => "文本",
            ColumnKind::Number => "数字",
            ColumnKind::Date => "日期",
            ColumnKind::Dropdown => "下拉",
        }
    }
}

/// A typed column of a sub-table field. Owned by the field's configuration.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubTableColumn {
    pub id: String,
    pub kind: ColumnKind,
    pub label: String,
}

impl SubTableColumn {
    pub fn new(id: &str, kind: ColumnKind, label: &str) -> Self {
        SubTableColumn {
            id: id.to_string(),
            kind,
            label: label.to_string(),
        }
    }
}

/// Kind-specific field configuration.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "config", rename_all = "kebab-case")]
pub enum FieldConfig {
    Text(TextConfig),
    MultilineText(TextAreaConfig),
    Number(NumberConfig),
    Money(MoneyConfig),
    SingleChoice(ChoiceConfig),
    MultiChoice(ChoiceConfig),
    Dropdown(ChoiceConfig),
    Date(DateConfig),
    FileUpload(UploadConfig),
    Signature(SignatureConfig),
    SubTable(SubTableConfig),
}

impl FieldConfig {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldConfig::Text(_) => FieldKind::Text,
            FieldConfig::MultilineText(_) => FieldKind::MultilineText,
            FieldConfig::Number(_) => FieldKind::Number,
            FieldConfig::Money(_) => FieldKind::Money,
            FieldConfig::SingleChoice(_) => FieldKind::SingleChoice,
            FieldConfig::MultiChoice(_) => FieldKind::MultiChoice,
            FieldConfig::Dropdown(_) => FieldKind::Dropdown,
            FieldConfig::Date(_) => FieldKind::Date,
            FieldConfig::FileUpload(_) => FieldKind::FileUpload,
            FieldConfig::Signature(_) => FieldKind::Signature,
            FieldConfig::SubTable(_) => FieldKind::SubTable,
        }
    }

    pub fn common(&self) -> &CommonProps {
        match self {
            FieldConfig::Text(c) => &c.common,
            FieldConfig::MultilineText(c) => &c.common,
            FieldConfig::Number(c) => &c.common,
            FieldConfig::Money(c) => &c.common,
            FieldConfig::SingleChoice(c)
            | FieldConfig::MultiChoice(c)
            | FieldConfig::Dropdown(c) => &c.common,
            FieldConfig::Date(c) => &c.common,
            FieldConfig::FileUpload(c) => &c.common,
            FieldConfig::Signature(c) => &c.common,
            FieldConfig::SubTable(c) => &c.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonProps {
        match self {
            FieldConfig::Text(c) => &mut c.common,
            FieldConfig::MultilineText(c) => &mut c.common,
            FieldConfig::Number(c) => &mut c.common,
            FieldConfig::Money(c) => &mut c.common,
            FieldConfig::SingleChoice(c)
            | FieldConfig::MultiChoice(c)
            | FieldConfig::Dropdown(c) => &mut c.common,
            FieldConfig::Date(c) => &mut c.common,
            FieldConfig::FileUpload(c) => &mut c.common,
            FieldConfig::Signature(c) => &mut c.common,
            FieldConfig::SubTable(c) => &mut c.common,
        }
    }

    pub fn required(&self) -> bool {
        self.common().required
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.common().placeholder.as_deref()
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldConfig::SingleChoice(c)
            | FieldConfig::MultiChoice(c)
            | FieldConfig::Dropdown(c) => Some(&c.options),
            _ => None,
        }
    }

    pub fn as_sub_table(&self) -> Option<&SubTableConfig> {
        match self {
            FieldConfig::SubTable(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_kind() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.default_config().kind(), kind);
        }
    }

    #[test]
    fn test_library_defaults() {
        match FieldKind::Text.default_config() {
            FieldConfig::Text(c) => {
                assert_eq!(c.max_length, Some(100));
                assert_eq!(c.common.placeholder.as_deref(), Some("请输入"));
                assert!(!c.common.required);
            }
            other => panic!("unexpected config {:?}", other),
        }

        match FieldKind::FileUpload.default_config() {
            FieldConfig::FileUpload(c) => {
                assert!(c.accepts(FileType::Image));
                assert!(c.accepts(FileType::Doc));
                assert!(!c.accepts(FileType::Zip));
                assert_eq!(c.max_size_mb, 10);
                assert_eq!(c.max_count, 3);
            }
            other => panic!("unexpected config {:?}", other),
        }

        assert!(FieldKind::Signature.default_config().required());
        let sub = FieldKind::SubTable.default_config();
        let sub = sub.as_sub_table().unwrap();
        assert_eq!(sub.columns.len(), 2);
        assert_eq!(sub.max_rows, Some(10));
    }

    #[test]
    fn test_choice_kinds_have_options() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.is_choice(), kind.default_config().options().is_some());
        }
        assert_eq!(
            FieldKind::MultiChoice.default_config().options().unwrap().len(),
            3
        );
    }

    #[test]
    fn test_placeholder_kinds() {
        for kind in FieldKind::ALL {
            assert_eq!(
                kind.has_placeholder(),
                kind.default_config().placeholder().is_some(),
                "placeholder mismatch for {}",
                kind
            );
        }
    }

    #[test]
    fn test_effective_max_length() {
        let config = TextConfig {
            common: CommonProps::default(),
            max_length: None,
        };
        assert_eq!(config.effective_max_length(), DEFAULT_TEXT_MAX_LENGTH);
        let config = TextAreaConfig {
            common: CommonProps::default(),
            rows: 3,
            max_length: Some(40),
        };
        assert_eq!(config.effective_max_length(), 40);
    }

    #[test]
    fn test_date_format() {
        assert_eq!(DateFormat::Date.hint(), "YYYY-MM-DD");
        assert_eq!(DateFormat::DateTime.hint(), "YYYY-MM-DD HH:mm");
        assert_eq!(DateFormat::Date.toggled(), DateFormat::DateTime);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::SubTable.to_string(), "sub-table");
        assert_eq!(FieldKind::MultilineText.to_string(), "multiline-text");
    }
}
