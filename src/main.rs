//! main.rs

use contact_relay::configurations::get_configuration;
use contact_relay::startup::Application;
use contact_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("contact_relay".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration");
    if let Err(missing) = configuration.email.smtp_parameters() {
        // Not fatal: submissions are answered with a 500 until this is fixed.
        tracing::warn!(missing = ?missing, "SMTP settings are incomplete");
    }

    let application = Application::build(configuration)?;
    tracing::info!(port = application.port(), "Server starting");
    application.run_until_stopped().await
}
