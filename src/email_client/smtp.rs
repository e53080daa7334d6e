//! src/email_client/smtp.rs

use super::{compose, ComposedEmail, MailError, Mailer};
use crate::configurations::{EmailSettings, SmtpParameters, SmtpTls};
use crate::domain::{Attachment, Submission};
use anyhow::Context;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as AttachmentPart, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

/// Opens one SMTP session per submission with the configured credentials.
pub struct SmtpMailer {
    settings: EmailSettings,
}

impl SmtpMailer {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    fn transport(
        &self,
        parameters: &SmtpParameters<'_>,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, lettre::transport::smtp::Error> {
        let builder = match self.settings.tls {
            SmtpTls::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(parameters.host)?
            }
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(parameters.host)?,
            SmtpTls::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(parameters.host),
        };

        Ok(builder
            .port(parameters.port)
            .credentials(Credentials::new(
                parameters.username.to_string(),
                parameters.password.expose_secret().to_string(),
            ))
            .authentication(vec![Mechanism::Plain])
            .timeout(Some(self.settings.timeout()))
            .build())
    }
}

async fn build_message(
    parameters: &SmtpParameters<'_>,
    email: ComposedEmail,
    attachments: &[Attachment],
) -> Result<Message, anyhow::Error> {
    let from: Mailbox = parameters
        .username
        .parse()
        .context("The SMTP username is not a valid sender address")?;
    let to: Mailbox = parameters
        .recipient
        .parse()
        .context("The recipient is not a valid email address")?;

    let builder = Message::builder().from(from).to(to).subject(email.subject);

    if attachments.is_empty() {
        return builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .context("Failed to build the email message");
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body));
    for attachment in attachments {
        let content = tokio::fs::read(&attachment.path)
            .await
            .with_context(|| format!("Failed to read attachment {}", attachment.path.display()))?;
        let declared = attachment
            .content_type
            .as_deref()
            .and_then(|ct| ContentType::parse(ct).ok());
        let content_type = match declared {
            Some(content_type) => content_type,
            None => ContentType::parse("application/octet-stream")
                .context("Failed to build the fallback attachment content type")?,
        };
        parts = parts.singlepart(
            AttachmentPart::new(attachment.filename.clone()).body(content, content_type),
        );
    }

    builder
        .multipart(parts)
        .context("Failed to build the email message")
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(
        name = "Sending the contact email over SMTP",
        skip_all,
        fields(attachments = attachments.len())
    )]
    async fn send(
        &self,
        submission: &Submission,
        attachments: &[Attachment],
    ) -> Result<(), MailError> {
        let parameters = self.settings.smtp_parameters().map_err(|missing| {
            tracing::error!(missing = ?missing, "SMTP configuration is incomplete");
            MailError::ConfigurationMissing(missing)
        })?;

        let email = compose(submission, attachments, &self.settings.site_name);
        let message = build_message(&parameters, email, attachments)
            .await
            .map_err(MailError::SendFailed)?;
        let transport = self
            .transport(&parameters)
            .context("Failed to set up the SMTP transport")
            .map_err(MailError::SendFailed)?;

        tokio::time::timeout(self.settings.timeout(), transport.send(message))
            .await
            .context("Timed out while talking to the SMTP server")
            .map_err(MailError::SendFailed)?
            .context("The SMTP server did not accept the message")
            .map_err(MailError::SendFailed)?;

        tracing::info!(recipient = parameters.recipient, "Contact email sent");
        Ok(())
    }
}
