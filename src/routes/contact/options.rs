//! src/routes/contact/options.rs

use super::ContactError;
use actix_web::HttpResponse;

pub async fn contact_preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> Result<HttpResponse, ContactError> {
    Err(ContactError::MethodNotAllowed)
}
