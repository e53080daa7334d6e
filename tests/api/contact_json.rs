//! tests/api/contact_json.rs

use crate::helpers::{
    spawn_app, spawn_app_with, spawn_app_with_failing_mailer, test_configuration,
    valid_submission, SITE_NAME,
};
use contact_relay::configurations::SmtpTls;
use contact_relay::email_client::{InMemoryMailer, SmtpMailer};
use secrecy::Secret;

#[tokio::test]
async fn contact_returns_200_and_sends_one_email_for_valid_json() {
    let app = spawn_app().await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert!(body["message"].is_string());

    let attempts = app.mailer.attempts();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].subject.contains("Jane Doe"));
    assert!(attempts[0].body.contains("Hello"));
    assert!(attempts[0].attachments.is_empty());
}

#[tokio::test]
async fn contact_returns_400_when_required_fields_are_missing() {
    let app = spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({"email": "jane@example.com", "message": "Hi"}), "missing name"),
        (serde_json::json!({"name": "Jane", "message": "Hi"}), "missing email"),
        (serde_json::json!({"name": "Jane", "email": "jane@example.com"}), "missing message"),
        (
            serde_json::json!({"name": "   ", "email": "jane@example.com", "message": "Hi"}),
            "whitespace name",
        ),
        (
            serde_json::json!({"name": "Jane", "email": "", "message": "\n\t"}),
            "empty email and blank message",
        ),
        (serde_json::json!({}), "empty object"),
    ];

    for (invalid_body, description) in test_cases {
        let response = app.post_contact_json(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 when the payload had {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Missing required fields:"));
    }

    assert!(app.mailer.attempts().is_empty());
}

#[tokio::test]
async fn project_type_is_optional_for_json_submissions() {
    let app = spawn_app().await;
    let body = serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "message": "Hello"
    });

    let response = app.post_contact_json(&body).await;

    assert_eq!(200, response.status().as_u16());
    let attempts = app.mailer.attempts();
    assert!(attempts[0].body.contains("- Project Type: Not provided"));
}

#[tokio::test]
async fn malformed_json_is_rejected_with_400() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.contact_url())
        .header("Content-Type", "application/json")
        .body(r#"{"name": "Jane", "email": "#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid request body");
    assert!(app.mailer.attempts().is_empty());
}

#[tokio::test]
async fn json_body_over_the_size_limit_is_rejected() {
    let mut configuration = test_configuration();
    configuration.uploads.max_body_bytes = 1024;
    let app = spawn_app_with(InMemoryMailer::new(SITE_NAME), configuration).await;
    let mut body = valid_submission();
    body["message"] = serde_json::Value::String("x".repeat(2048));

    let response = app.post_contact_json(&body).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid request body");
    assert!(app.mailer.attempts().is_empty());
}

#[tokio::test]
async fn identical_submissions_send_two_emails() {
    let app = spawn_app().await;

    app.post_contact_json(&valid_submission()).await;
    app.post_contact_json(&valid_submission()).await;

    assert_eq!(app.mailer.attempts().len(), 2);
}

#[tokio::test]
async fn send_failure_returns_500_without_details() {
    let app = spawn_app_with_failing_mailer().await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Failed to send email");
    assert_eq!(app.mailer.attempts().len(), 1);
}

#[tokio::test]
async fn missing_smtp_configuration_returns_500_without_leaking_the_password() {
    let password = "super-secret-smtp-password";
    let mut configuration = test_configuration();
    configuration.email.smtp_host = None;
    configuration.email.smtp_port = None;
    configuration.email.smtp_username = None;
    configuration.email.recipient = None;
    configuration.email.smtp_password = Some(Secret::new(password.to_string()));
    let app = spawn_app_with(SmtpMailer::new(configuration.email.clone()), configuration).await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(!body.contains(password));
    assert!(body.contains("Email service is not configured"));
}

#[tokio::test]
async fn fully_unset_smtp_configuration_returns_500() {
    let mut configuration = test_configuration();
    configuration.email.smtp_host = None;
    configuration.email.smtp_port = None;
    configuration.email.smtp_username = None;
    configuration.email.smtp_password = None;
    configuration.email.recipient = None;
    let app = spawn_app_with(SmtpMailer::new(configuration.email.clone()), configuration).await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn unreachable_smtp_server_returns_500_without_leaking_the_password() {
    let password = "another-secret-password";
    let unused_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut configuration = test_configuration();
    configuration.email.smtp_host = Some("127.0.0.1".into());
    configuration.email.smtp_port = Some(unused_port);
    configuration.email.smtp_username = Some("sender@example.com".into());
    configuration.email.smtp_password = Some(Secret::new(password.to_string()));
    configuration.email.recipient = Some("owner@example.com".into());
    configuration.email.tls = SmtpTls::Plain;
    configuration.email.timeout_milliseconds = 2_000;
    let app = spawn_app_with(SmtpMailer::new(configuration.email.clone()), configuration).await;

    let response = app.post_contact_json(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(!body.contains(password));
    assert!(body.contains("Failed to send email"));
}
