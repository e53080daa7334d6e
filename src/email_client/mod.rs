//! src/email_client/mod.rs

mod in_memory;
mod smtp;

pub use in_memory::{InMemoryMailer, SentAttachment, SentEmail};
pub use smtp::SmtpMailer;

use crate::domain::{Attachment, Submission};
use crate::utils::error_chain_fmt;
use std::fmt::Write;

/// Delivers one contact form submission to the site owner.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(
        &self,
        submission: &Submission,
        attachments: &[Attachment],
    ) -> Result<(), MailError>;
}

#[derive(thiserror::Error)]
pub enum MailError {
    #[error("The SMTP settings are incomplete")]
    ConfigurationMissing(Vec<&'static str>),
    #[error("Failed to send the email")]
    SendFailed(#[source] anyhow::Error),
}

impl std::fmt::Debug for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)?;
        if let Self::ConfigurationMissing(missing) = self {
            writeln!(f, "Missing settings: {}", missing.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub body: String,
}

/// Renders the subject and plaintext body sent for a submission.
pub fn compose(
    submission: &Submission,
    attachments: &[Attachment],
    site_name: &str,
) -> ComposedEmail {
    fn or_not_provided(value: &str) -> &str {
        if value.is_empty() {
            "Not provided"
        } else {
            value
        }
    }

    let subject = format!("New Contact Form Submission from {}", submission.name);

    let mut body = format!(
        "New contact form submission from the {site_name} website.\n\
        \n\
        Contact Information:\n\
        - Name: {}\n\
        - Email: {}\n\
        - Phone: {}\n\
        - Location: {}\n\
        \n\
        Project Details:\n\
        - Project Type: {}\n\
        - Timeline: {}\n\
        - Budget: {}\n\
        \n\
        Message:\n\
        {}\n",
        submission.name,
        submission.email,
        or_not_provided(&submission.phone),
        or_not_provided(&submission.location),
        or_not_provided(&submission.project_type),
        or_not_provided(&submission.timeline),
        or_not_provided(&submission.budget),
        submission.message,
    );

    if !attachments.is_empty() {
        body.push_str("\nAttachments:\n");
        for attachment in attachments {
            // Writing into a String cannot fail.
            let _ = writeln!(body, "- {}", attachment.filename);
        }
    }

    let _ = write!(
        body,
        "\n---\nThis email was automatically generated from the contact form at {site_name}.\n"
    );

    ComposedEmail { subject, body }
}
