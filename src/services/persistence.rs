//! Draft persistence seam of the designer.
//!
//! Saving a draft is an explicit, terminal action handed to a `DraftSink`.
//! The console ships with `LogDraftSink`, which serializes a JSON snapshot
//! of the document and logs it without writing anything durable.

use super::error::ServiceError;
use crate::form::FormDocument;
use log::*;

/// Acknowledgement returned by a draft sink.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftReceipt {
    pub form_title: String,
    pub field_count: usize,
    pub bytes: usize,
    pub saved_at: String,
}

/// Receives saved drafts.
///
pub trait DraftSink: Send {
    fn save_draft(&self, document: &FormDocument) -> Result<DraftReceipt, ServiceError>;
}

/// Draft sink that logs a JSON snapshot.
///
#[derive(Clone, Debug, Default)]
pub struct LogDraftSink;

impl DraftSink for LogDraftSink {
    fn save_draft(&self, document: &FormDocument) -> Result<DraftReceipt, ServiceError> {
        let snapshot = serde_json::to_string(document)?;
        debug!("Draft snapshot: {}", snapshot);
        info!(
            "Saved draft '{}' ({} fields, {} bytes)",
            document.title,
            document.fields().len(),
            snapshot.len()
        );
        Ok(DraftReceipt {
            form_title: document.title.clone(),
            field_count: document.fields().len(),
            bytes: snapshot.len(),
            saved_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::document::InsertSource;
    use crate::form::{DesignerMode, FieldKind};

    #[test]
    fn test_log_draft_sink_snapshot() {
        let mut document = FormDocument::blank(DesignerMode::Form);
        document
            .insert_field(InsertSource::Kind(FieldKind::SubTable), 1)
            .unwrap();
        let receipt = LogDraftSink.save_draft(&document).unwrap();
        assert_eq!(receipt.field_count, 2);
        assert_eq!(receipt.form_title, "未命名表单");

        let snapshot = serde_json::to_value(&document).unwrap();
        assert_eq!(snapshot["fields"][1]["config"]["kind"], "sub-table");
        assert_eq!(snapshot["fields"][0]["config"]["config"]["max_length"], 20);
        assert_eq!(snapshot["pages"][0], 1);
    }
}
