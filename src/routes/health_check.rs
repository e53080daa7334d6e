//! src/routes/health_check.rs

use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    time: String,
}

/// Liveness only: answers `ok` whether or not SMTP is configured.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
