//! src/email_client/in_memory.rs

use super::{compose, MailError, Mailer};
use crate::domain::{Attachment, Submission};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
pub struct SentAttachment {
    pub filename: String,
    pub path: PathBuf,
    /// File content as it was on disk when `send` ran.
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<SentAttachment>,
}

/// Records composed emails instead of delivering them.
pub struct InMemoryMailer {
    site_name: String,
    fail_every_send: bool,
    attempts: Mutex<Vec<SentEmail>>,
}

impl InMemoryMailer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            fail_every_send: false,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// A mailer that records each attempt and then reports a send failure.
    pub fn failing(site_name: impl Into<String>) -> Self {
        Self {
            fail_every_send: true,
            ..Self::new(site_name)
        }
    }

    /// Every email passed to `send`, delivered or not, oldest first.
    pub fn attempts(&self) -> Vec<SentEmail> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Mailer for InMemoryMailer {
    async fn send(
        &self,
        submission: &Submission,
        attachments: &[Attachment],
    ) -> Result<(), MailError> {
        let email = compose(submission, attachments, &self.site_name);

        let mut sent_attachments = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            let content = tokio::fs::read(&attachment.path)
                .await
                .with_context(|| format!("Failed to read attachment {}", attachment.path.display()))
                .map_err(MailError::SendFailed)?;
            sent_attachments.push(SentAttachment {
                filename: attachment.filename.clone(),
                path: attachment.path.clone(),
                content,
            });
        }

        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentEmail {
                subject: email.subject,
                body: email.body,
                attachments: sent_attachments,
            });

        if self.fail_every_send {
            return Err(MailError::SendFailed(anyhow::anyhow!(
                "The in-memory mailer is configured to fail"
            )));
        }
        Ok(())
    }
}
