//! src/routes/contact/post.rs

use super::errors::StatusBody;
use super::{ContactError, Decoder};
use crate::configurations::UploadSettings;
use crate::domain::StoredAttachments;
use crate::email_client::Mailer;
use actix_web::{web, HttpRequest, HttpResponse};

#[tracing::instrument(
    name = "Relaying a contact form submission",
    skip(request, payload, mailer, uploads),
    fields(
        decoder = tracing::field::Empty,
        submitter_name = tracing::field::Empty,
        submitter_email = tracing::field::Empty,
        attachments = tracing::field::Empty,
    )
)]
pub async fn submit_contact_form(
    request: HttpRequest,
    payload: web::Payload,
    mailer: web::Data<dyn Mailer>,
    uploads: web::Data<UploadSettings>,
) -> Result<HttpResponse, ContactError> {
    let decoder = Decoder::for_request(&request);
    tracing::Span::current().record("decoder", &tracing::field::debug(&decoder));

    let decoded = decoder
        .decode(&request, payload, uploads.max_body_bytes)
        .await?;
    let submission = decoded.submission;
    tracing::Span::current()
        .record("submitter_name", &tracing::field::display(&submission.name))
        .record("submitter_email", &tracing::field::display(&submission.email));

    // The guard still deletes the files if this future is dropped mid-send.
    let attachments = StoredAttachments::save(&uploads.directory, decoded.attachments).await;
    tracing::Span::current().record("attachments", attachments.len());

    let outcome = mailer.send(&submission, attachments.as_slice()).await;
    attachments.remove().await;
    outcome.map_err(|e| {
        tracing::error!(error.cause_chain = ?e, "Failed to relay the submission");
        ContactError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(StatusBody {
        status: "success",
        message: "Your message has been sent successfully!",
    }))
}
