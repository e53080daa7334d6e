//! src/routes/contact/decode.rs

use super::ContactError;
use crate::domain::{ContactFormData, PendingAttachment, Submission, SubmissionSource};
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest};
use futures_util::{StreamExt, TryStreamExt};

const ATTACHMENT_FIELD: &str = "files";

pub struct DecodedSubmission {
    pub submission: Submission,
    pub attachments: Vec<PendingAttachment>,
}

/// Turns a request body into a validated [`Submission`]. The strategy is
/// picked from the `Content-Type` header; everything that is not
/// `multipart/form-data` is treated as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Json,
    Multipart,
}

impl Decoder {
    pub fn for_request(request: &HttpRequest) -> Self {
        let is_multipart = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            })
            .unwrap_or(false);

        if is_multipart {
            Decoder::Multipart
        } else {
            Decoder::Json
        }
    }

    /// Reads at most `limit` bytes of content. Nothing is written to disk.
    pub async fn decode(
        self,
        request: &HttpRequest,
        payload: web::Payload,
        limit: usize,
    ) -> Result<DecodedSubmission, ContactError> {
        match self {
            Decoder::Json => decode_json(payload, limit).await,
            Decoder::Multipart => decode_multipart(request, payload, limit).await,
        }
    }
}

fn invalid_body() -> ContactError {
    ContactError::BadRequest("Invalid request body".into())
}

fn unparsable_form() -> ContactError {
    ContactError::BadRequest("Error parsing form".into())
}

#[tracing::instrument(name = "Decoding a JSON submission", skip(payload))]
async fn decode_json(
    mut payload: web::Payload,
    limit: usize,
) -> Result<DecodedSubmission, ContactError> {
    let mut body = web::BytesMut::new();
    let mut overflowed = false;

    // Oversized bodies are still drained so the client gets to read the 400.
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read the request body");
            invalid_body()
        })?;
        if overflowed || body.len() + chunk.len() > limit {
            overflowed = true;
            continue;
        }
        body.extend_from_slice(&chunk);
    }
    if overflowed {
        tracing::warn!("The request body exceeds the size limit");
        return Err(invalid_body());
    }

    let form: ContactFormData = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to deserialize the request body");
        invalid_body()
    })?;
    let submission =
        Submission::parse(form, SubmissionSource::Json).map_err(ContactError::BadRequest)?;

    Ok(DecodedSubmission {
        submission,
        attachments: Vec::new(),
    })
}

#[tracing::instrument(name = "Decoding a multipart submission", skip(request, payload))]
async fn decode_multipart(
    request: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<DecodedSubmission, ContactError> {
    let form_error = |e: MultipartError| {
        tracing::warn!(error = %e, "Failed to parse the multipart body");
        unparsable_form()
    };

    let mut multipart = Multipart::new(request.headers(), payload);
    let mut form = ContactFormData::default();
    let mut attachments = Vec::new();
    let mut consumed = 0usize;
    let mut overflowed = false;

    while let Some(mut field) = multipart.try_next().await.map_err(form_error)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(ToString::to_string);

        // Past the cap every remaining part is still read to the end, only
        // its bytes are thrown away, so the 400 reaches the client.
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(form_error)? {
            consumed += chunk.len();
            if consumed > limit {
                overflowed = true;
            }
            if !overflowed {
                content.extend_from_slice(&chunk);
            }
        }
        if overflowed {
            continue;
        }

        // Only real file uploads become attachments; a plain text `files`
        // part carries no filename.
        if name == ATTACHMENT_FIELD {
            match filename.as_deref() {
                Some(filename) if !filename.is_empty() => {
                    attachments.push(PendingAttachment::new(filename, content_type, content))
                }
                _ => tracing::debug!("Ignoring a `files` part without a filename"),
            }
            continue;
        }

        match String::from_utf8(content) {
            Ok(value) => {
                if !form.set(&name, value) {
                    tracing::debug!(field = %name, "Ignoring an unknown form field");
                }
            }
            Err(_) => tracing::warn!(field = %name, "Ignoring a form field that is not UTF-8"),
        }
    }

    if overflowed {
        tracing::warn!(consumed, "The multipart body exceeds the size limit");
        return Err(unparsable_form());
    }

    let submission =
        Submission::parse(form, SubmissionSource::Multipart).map_err(ContactError::BadRequest)?;

    Ok(DecodedSubmission {
        submission,
        attachments,
    })
}
