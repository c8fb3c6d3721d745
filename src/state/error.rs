//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Designer action while no designer session is open
    #[error("No designer session is open")]
    DesignerNotOpen,

    /// Action needs a form from the list
    #[error("No form selected")]
    NoFormSelected,

    /// Action needs a channel from the list
    #[error("No channel selected")]
    NoChannelSelected,

    /// Action needs a template from the list
    #[error("No template selected")]
    NoTemplateSelected,

    /// Action needs a field on the canvas
    #[error("No field selected")]
    NoFieldSelected,

    /// Built-in template opened for editing
    #[error("System template '{0}' is read-only")]
    ReadOnlyTemplate(String),

    /// Clipboard could not be reached
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::DesignerNotOpen;
        assert!(error.to_string().contains("designer"));

        let error = StateError::NoFormSelected;
        assert!(error.to_string().contains("No form"));

        let error = StateError::ReadOnlyTemplate("tpl_bank".to_string());
        assert!(error.to_string().contains("tpl_bank"));
        assert!(error.to_string().contains("read-only"));

        let error = StateError::Clipboard("no display".to_string());
        assert!(error.to_string().contains("no display"));
    }
}
