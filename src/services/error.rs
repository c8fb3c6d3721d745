//! Collaborator-specific error types.

/// Errors that can occur in the channel, submission and form stores.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Channel does not exist
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Mutation attempted on a built-in channel
    #[error("System channel '{0}' cannot be deleted")]
    SystemChannel(String),

    /// Form does not exist in the catalog
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// Required name left empty
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// Failed to serialize a draft snapshot
    #[error("Failed to serialize draft: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let error = ServiceError::ChannelNotFound("C09".to_string());
        assert!(error.to_string().contains("Channel not found"));
        assert!(error.to_string().contains("C09"));

        let error = ServiceError::SystemChannel("sys_app".to_string());
        assert!(error.to_string().contains("sys_app"));

        let error = ServiceError::EmptyName("Channel name");
        assert_eq!(error.to_string(), "Channel name must not be empty");

        let error = ServiceError::FormNotFound("F009".to_string());
        assert!(error.to_string().contains("F009"));
    }
}
