//! Form designer-specific error types.

use super::document::PageId;
use super::schema::FieldKind;

/// Errors that can occur while editing a form document or the template store.
///
/// Every operation that returns one of these leaves the edited value unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Deleting the only remaining page
    #[error("A form must keep at least one page")]
    LastPage,

    /// Page does not exist in the document
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    /// Field does not exist in the document
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Property edit targets a kind that does not carry the property
    #[error("Property '{property}' does not apply to {kind} fields")]
    PatchNotApplicable {
        kind: FieldKind,
        property: &'static str,
    },

    /// Numeric property outside its accepted range
    #[error("{property} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        property: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    /// Option index outside the option list
    #[error("Option {index} not found")]
    OptionNotFound { index: usize },

    /// Sub-table column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Replacement configuration of a different kind
    #[error("A {found} configuration cannot replace a {expected} field")]
    KindMismatch { expected: FieldKind, found: FieldKind },

    /// Unparsable property input
    #[error("Invalid value for {property}: {message}")]
    InvalidValue {
        property: &'static str,
        message: String,
    },

    /// Template does not exist in the store
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Mutation attempted on a system template
    #[error("System template '{0}' cannot be modified")]
    SystemTemplate(String),

    /// Required name or title left empty
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_display() {
        let error = FormError::LastPage;
        assert!(error.to_string().contains("at least one page"));

        let error = FormError::PageNotFound(3);
        assert!(error.to_string().contains("Page not found: 3"));

        let error = FormError::PatchNotApplicable {
            kind: FieldKind::Signature,
            property: "options",
        };
        assert!(error.to_string().contains("options"));
        assert!(error.to_string().contains("signature"));

        let error = FormError::ValueOutOfRange {
            property: "max rows",
            min: 1,
            max: 20,
            value: 25,
        };
        assert!(error.to_string().contains("between 1 and 20"));
        assert!(error.to_string().contains("25"));

        let error = FormError::SystemTemplate("tpl_identity".to_string());
        assert!(error.to_string().contains("tpl_identity"));

        let error = FormError::EmptyName("Template title");
        assert_eq!(error.to_string(), "Template title must not be empty");
    }
}
