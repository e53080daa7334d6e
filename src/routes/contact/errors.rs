//! src/routes/contact/errors.rs

use crate::email_client::MailError;
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Email service is not configured")]
    ConfigurationMissing(Vec<&'static str>),
    #[error("Failed to send email")]
    EmailSendFailed(#[source] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<MailError> for ContactError {
    fn from(value: MailError) -> Self {
        match value {
            MailError::ConfigurationMissing(missing) => Self::ConfigurationMissing(missing),
            MailError::SendFailed(e) => Self::EmailSendFailed(e),
        }
    }
}

#[derive(serde::Serialize)]
pub struct StatusBody<'a> {
    pub status: &'static str,
    pub message: &'a str,
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ConfigurationMissing(_) | Self::EmailSendFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Only the `Display` text reaches the client; causes stay in the logs.
    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(StatusBody {
            status: "error",
            message: &message,
        })
    }
}
