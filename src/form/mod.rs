//! Form designer core.
//!
//! Field schema, the form document model, the designer session, the shared
//! field renderer and the component and template libraries.

pub mod designer;
pub mod document;
pub mod error;
pub mod fill;
pub mod library;
pub mod panel;
pub mod patch;
pub mod render;
pub mod schema;
pub mod subtable;
pub mod template;

pub use designer::{Designer, DesignerMode};
pub use document::{FieldId, FieldInstance, FormDocument, PageId};
pub use error::FormError;
pub use library::ComponentLibrary;
pub use schema::{FieldConfig, FieldKind};
pub use template::{ComponentTemplate, TemplateStore};
