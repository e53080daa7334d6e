//! src/domain/mod.rs

mod attachment;
mod required_field;
mod submission;

pub use attachment::{Attachment, PendingAttachment, StoredAttachments};
pub use required_field::RequiredField;
pub use submission::{ContactFormData, Submission, SubmissionSource};
