//! src/domain/attachment.rs

use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A `files` part held in memory until the submission has been validated.
#[derive(Debug)]
pub struct PendingAttachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl PendingAttachment {
    /// Only the last path component of the client supplied name is kept.
    pub fn new(filename: &str, content_type: Option<String>, content: Vec<u8>) -> Self {
        let filename = match filename.rsplit(|c: char| c == '/' || c == '\\').next() {
            Some(base) if !base.is_empty() && base != "." && base != ".." => base.to_string(),
            _ => "attachment".to_string(),
        };
        Self {
            filename,
            content_type,
            content,
        }
    }
}

/// An attachment written to the upload directory.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub path: PathBuf,
}

/// Owns the files written for one request and deletes them when dropped.
#[derive(Debug, Default)]
pub struct StoredAttachments {
    attachments: Vec<Attachment>,
}

impl StoredAttachments {
    /// Writes every pending attachment into `directory`. Parts that cannot be
    /// written are logged and left out.
    #[tracing::instrument(
        name = "Saving attachments",
        skip(pending),
        fields(pending = pending.len())
    )]
    pub async fn save(directory: &Path, pending: Vec<PendingAttachment>) -> Self {
        let mut stored = Self::default();
        if pending.is_empty() {
            return stored;
        }
        if let Err(e) = tokio::fs::create_dir_all(directory).await {
            tracing::warn!(
                error = %e,
                "Skipping all attachments, the upload directory could not be created"
            );
            return stored;
        }

        for attachment in pending {
            let path = directory.join(format!(
                "{}_{}_{}",
                Utc::now().timestamp_millis(),
                Uuid::new_v4().simple(),
                attachment.filename
            ));
            match tokio::fs::write(&path, &attachment.content).await {
                Ok(()) => stored.attachments.push(Attachment {
                    filename: attachment.filename,
                    content_type: attachment.content_type,
                    path,
                }),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        filename = %attachment.filename,
                        "Skipping an attachment that could not be saved"
                    );
                    let _ = tokio::fs::remove_file(&path).await;
                }
            }
        }
        stored
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    /// Deletes the files without blocking the worker thread.
    pub async fn remove(mut self) {
        for attachment in std::mem::take(&mut self.attachments) {
            if let Err(e) = tokio::fs::remove_file(&attachment.path).await {
                tracing::warn!(
                    error = %e,
                    path = %attachment.path.display(),
                    "Failed to remove a temporary attachment"
                );
            }
        }
    }
}

/// Fallback for paths that never reach [`StoredAttachments::remove`], such as
/// a cancelled request. Uses blocking calls.
impl Drop for StoredAttachments {
    fn drop(&mut self) {
        for attachment in &self.attachments {
            if let Err(e) = std::fs::remove_file(&attachment.path) {
                tracing::warn!(
                    error = %e,
                    path = %attachment.path.display(),
                    "Failed to remove a temporary attachment"
                );
            }
        }
    }
}
