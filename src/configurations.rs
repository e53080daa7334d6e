//! src/configurations.rs

use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use std::path::PathBuf;
use std::time::Duration;

/// Plain variables understood by the existing deployments. They take
/// precedence over both the yaml files and the `APP_*` overrides.
const LEGACY_ENV_OVERRIDES: [(&str, &str); 6] = [
    ("PORT", "application.port"),
    ("SMTP_HOST", "email.smtp_host"),
    ("SMTP_PORT", "email.smtp_port"),
    ("SMTP_USER", "email.smtp_username"),
    ("SMTP_PASSWORD", "email.smtp_password"),
    ("TO_EMAIL", "email.recipient"),
];

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
    pub uploads: UploadSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// SMTP settings are all optional at load time: a missing value only
/// becomes an error when a submission actually has to be mailed.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct EmailSettings {
    pub smtp_host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<Secret<String>>,
    pub recipient: Option<String>,
    #[serde(default)]
    pub tls: SmtpTls,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub site_name: String,
}

#[derive(serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    #[default]
    Starttls,
    Tls,
    #[serde(rename = "none")]
    Plain,
}

/// A fully populated view over [`EmailSettings`].
#[derive(Debug)]
pub struct SmtpParameters<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a Secret<String>,
    pub recipient: &'a str,
}

impl EmailSettings {
    /// Returns the connection parameters, or the names of every key that is
    /// absent or blank.
    pub fn smtp_parameters(&self) -> Result<SmtpParameters<'_>, Vec<&'static str>> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }

        let host = present(&self.smtp_host);
        let username = present(&self.smtp_username);
        let recipient = present(&self.recipient);
        let password = self
            .smtp_password
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty());

        match (host, self.smtp_port, username, password, recipient) {
            (Some(host), Some(port), Some(username), Some(password), Some(recipient)) => {
                Ok(SmtpParameters {
                    host,
                    port,
                    username,
                    password,
                    recipient,
                })
            }
            _ => {
                let mut missing = Vec::new();
                if host.is_none() {
                    missing.push("smtp_host");
                }
                if self.smtp_port.is_none() {
                    missing.push("smtp_port");
                }
                if username.is_none() {
                    missing.push("smtp_username");
                }
                if password.is_none() {
                    missing.push("smtp_password");
                }
                if recipient.is_none() {
                    missing.push("recipient");
                }
                Err(missing)
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct UploadSettings {
    pub directory: PathBuf,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_body_bytes: usize,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut builder = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(configuration_directory.join(environment_filename)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    for (variable, key) in LEGACY_ENV_OVERRIDES {
        let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
