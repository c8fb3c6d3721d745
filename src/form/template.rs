//! Component templates and the store shared by the template library screen
//! and the designer's insertion panel.

use super::error::FormError;
use super::schema::{
    ChoiceConfig, CommonProps, DateConfig, DateFormat, FieldConfig, FieldKind, TextConfig,
};
use log::*;
use serde::Serialize;

/// Category assigned to every user-created template.
pub const CUSTOM_CATEGORY: &str = "我的模版";

/// Specifying template ownership.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    System,
    Custom,
}

/// A field definition inside a template: a field instance without id and page.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateField {
    pub label: String,
    pub default_config: FieldConfig,
}

impl TemplateField {
    pub fn new(label: &str, default_config: FieldConfig) -> Self {
        TemplateField {
            label: label.to_string(),
            default_config,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.default_config.kind()
    }
}

/// Defines a named, categorized bundle of field definitions.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentTemplate {
    pub id: String,
    pub title: String,
    pub category: String,
    pub kind: TemplateKind,
    pub description: String,
    pub fields: Vec<TemplateField>,
    pub create_time: Option<String>,
}

impl ComponentTemplate {
    pub fn is_system(&self) -> bool {
        self.kind == TemplateKind::System
    }
}

/// Title, description and fields produced by the designer in template mode.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub title: String,
    pub description: String,
    pub fields: Vec<TemplateField>,
}

/// Oversees the system and custom template collections.
///
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: Vec<ComponentTemplate>,
    next_seq: u64,
}

impl Default for TemplateStore {
    fn default() -> Self {
        TemplateStore::seeded()
    }
}

impl TemplateStore {
    /// Return an empty store.
    ///
    pub fn new() -> Self {
        TemplateStore {
            templates: vec![],
            next_seq: 1,
        }
    }

    /// Return a store holding the built-in system templates and the sample
    /// custom template.
    ///
    pub fn seeded() -> Self {
        TemplateStore {
            templates: initial_templates(),
            next_seq: 1,
        }
    }

    pub fn list(&self) -> &[ComponentTemplate] {
        &self.templates
    }

    pub fn by_kind(&self, kind: TemplateKind) -> Vec<&ComponentTemplate> {
        self.templates.iter().filter(|t| t.kind == kind).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ComponentTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Create a custom template from a designer draft.
    ///
    pub fn create(&mut self, draft: TemplateDraft) -> Result<&ComponentTemplate, FormError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyName("Template title"));
        }
        let id = format!("tpl_custom_{}", self.next_seq);
        self.next_seq += 1;
        let template = ComponentTemplate {
            id: id.clone(),
            title: title.to_string(),
            category: CUSTOM_CATEGORY.to_string(),
            kind: TemplateKind::Custom,
            description: draft.description,
            fields: draft.fields,
            create_time: Some(chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()),
        };
        info!("Created custom template '{}' ({})", template.title, id);
        self.templates.push(template);
        self.templates
            .last()
            .ok_or(FormError::TemplateNotFound(id))
    }

    /// Replace title, description and fields of a custom template.
    ///
    pub fn update(&mut self, id: &str, draft: TemplateDraft) -> Result<(), FormError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(FormError::EmptyName("Template title"));
        }
        let template = self.custom_mut(id)?;
        template.title = title;
        template.description = draft.description;
        template.fields = draft.fields;
        info!("Updated custom template {}", id);
        Ok(())
    }

    /// Delete a custom template. Confirmation is the caller's concern.
    ///
    pub fn delete(&mut self, id: &str) -> Result<ComponentTemplate, FormError> {
        self.custom_mut(id)?;
        let pos = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FormError::TemplateNotFound(id.to_string()))?;
        let removed = self.templates.remove(pos);
        info!("Deleted custom template {}", id);
        Ok(removed)
    }

    fn custom_mut(&mut self, id: &str) -> Result<&mut ComponentTemplate, FormError> {
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| FormError::TemplateNotFound(id.to_string()))?;
        if template.is_system() {
            warn!("Refusing to modify system template {}", id);
            return Err(FormError::SystemTemplate(id.to_string()));
        }
        Ok(template)
    }
}

fn text(label: &str, required: bool, max_length: Option<u32>, placeholder: Option<&str>) -> TemplateField {
    TemplateField::new(
        label,
        FieldConfig::Text(TextConfig {
            common: CommonProps {
                placeholder: placeholder.map(str::to_string),
                required,
                description: None,
            },
            max_length,
        }),
    )
}

fn initial_templates() -> Vec<ComponentTemplate> {
    vec![
        ComponentTemplate {
            id: "tpl_identity".to_string(),
            title: "身份信息".to_string(),
            category: "基础信息".to_string(),
            kind: TemplateKind::System,
            description: "包含姓名、身份证号、手机号的标准组合，适用于大多数实名认证场景。"
                .to_string(),
            fields: vec![
                text("姓名", true, None, Some("请输入真实姓名")),
                text("身份证号", true, Some(18), Some("请输入18位身份证号")),
                text("手机号码", true, Some(11), Some("请输入联系电话")),
            ],
            create_time: None,
        },
        ComponentTemplate {
            id: "tpl_edu".to_string(),
            title: "学历信息".to_string(),
            category: "背景调查".to_string(),
            kind: TemplateKind::System,
            description: "包含毕业院校、学历层次、毕业时间，适用于教育背景核实。".to_string(),
            fields: vec![
                text("毕业院校", true, None, None),
                TemplateField::new(
                    "学历层次",
                    FieldConfig::Dropdown(ChoiceConfig {
                        common: CommonProps::with_placeholder("请选择"),
                        options: ["大专", "本科", "硕士", "博士"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    }),
                ),
                TemplateField::new(
                    "毕业时间",
                    FieldConfig::Date(DateConfig {
                        common: CommonProps::required(),
                        format: DateFormat::Date,
                    }),
                ),
            ],
            create_time: None,
        },
        ComponentTemplate {
            id: "tpl_bank".to_string(),
            title: "银行卡信息".to_string(),
            category: "资金发放".to_string(),
            kind: TemplateKind::System,
            description: "收集开户行、卡号及持卡人姓名，确保资金准确发放。".to_string(),
            fields: vec![
                text("开户银行", true, None, None),
                text("银行卡号", true, None, None),
                text("持卡人姓名", true, None, None),
            ],
            create_time: None,
        },
        ComponentTemplate {
            id: "tpl_custom_sample".to_string(),
            title: "助学专项模版".to_string(),
            category: CUSTOM_CATEGORY.to_string(),
            kind: TemplateKind::Custom,
            description: "包含学籍号、学校、年级等助学专用字段，针对秋季助学项目定制。"
                .to_string(),
            fields: vec![
                text("学籍号", false, None, None),
                text("学校", false, None, None),
                text("年级", false, None, None),
            ],
            create_time: None,
        },
    ]
}
