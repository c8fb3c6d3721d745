//! In-memory collaborators of the console.
//!
//! This module contains the thin stores behind the non-designer screens:
//! - Form catalog shown by the form list
//! - Distribution channels and share links
//! - Submissions and analysis figures
//! - Dashboard figures
//! - Draft persistence sink used by the designer

mod error;

pub mod channels;
pub mod dashboard;
pub mod forms;
pub mod persistence;
pub mod submissions;

pub use channels::{Channel, ChannelStore};
pub use dashboard::Dashboard;
pub use error::ServiceError;
pub use forms::{FormCatalog, FormItem, FormStatus};
pub use persistence::{DraftReceipt, DraftSink, LogDraftSink};
pub use submissions::{SubmissionFilter, SubmissionPage, SubmissionStore};
