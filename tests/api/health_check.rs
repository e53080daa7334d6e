//! tests/api/health_check.rs

use crate::helpers::{spawn_app, spawn_app_with, test_configuration};
use contact_relay::email_client::SmtpMailer;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app.get_health().await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["time"].is_string());
}

#[tokio::test]
async fn health_check_ignores_smtp_configuration() {
    let mut configuration = test_configuration();
    configuration.email.smtp_host = None;
    configuration.email.smtp_password = None;
    configuration.email.recipient = None;
    let app = spawn_app_with(SmtpMailer::new(configuration.email.clone()), configuration).await;

    let response = app.get_health().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
