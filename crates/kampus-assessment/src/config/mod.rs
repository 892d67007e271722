use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::assessment::{AnswerKey, AnswerKeyError, ClassifierConfig};

const DEFAULT_HR_EMAIL: &str = "hr@kampushr.com";
const DEFAULT_COMPANY_NAME: &str = "Kampus HR";
const DEFAULT_SENDER: &str = "no-reply@kampushr.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub notifications: NotificationConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
            assessment: AssessmentConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// SMTP settings. Without a server, notifications are only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: Option<String>,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: String,
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let server = optional_var("MAIL_SERVER");
        let port = match optional_var("MAIL_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidMailPort)?,
            None => 587,
        };
        let use_tls = flag_var("MAIL_USE_TLS", true)?;
        let username = optional_var("MAIL_USERNAME");
        let password = optional_var("MAIL_PASSWORD");
        let sender = optional_var("MAIL_SENDER")
            .or_else(|| username.clone())
            .unwrap_or_else(|| DEFAULT_SENDER.to_string());

        Ok(Self {
            server,
            port,
            use_tls,
            username,
            password,
            sender,
        })
    }

    pub fn enabled(&self) -> bool {
        self.server.is_some()
    }
}

/// Branding and recipients for outbound notifications.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub company_name: String,
    pub hr_recipients: Vec<String>,
    pub disclose_score: bool,
}

impl NotificationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let company_name =
            optional_var("COMPANY_NAME").unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());
        let hr_recipients: Vec<String> = env::var("HR_EMAIL")
            .unwrap_or_else(|_| DEFAULT_HR_EMAIL.to_string())
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect();
        if hr_recipients.is_empty() {
            return Err(ConfigError::MissingRecipients);
        }
        let disclose_score = flag_var("ASSESSMENT_DISCLOSE_SCORE", false)?;

        Ok(Self {
            company_name,
            hr_recipients,
            disclose_score,
        })
    }
}

/// Classifier switches plus optional locations for the answer key and the submission log.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub classifier: ClassifierConfig,
    pub key_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
}

impl AssessmentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ClassifierConfig::default();
        let classifier = ClassifierConfig {
            max_red_flags: number_var("ASSESSMENT_MAX_RED_FLAGS", defaults.max_red_flags)?,
            minimum_score: number_var("ASSESSMENT_MINIMUM_SCORE", defaults.minimum_score)?,
            minimum_inclusive: flag_var("ASSESSMENT_MINIMUM_INCLUSIVE", defaults.minimum_inclusive)?,
            elite_score: number_var("ASSESSMENT_ELITE_SCORE", defaults.elite_score)?,
            elite_inclusive: flag_var("ASSESSMENT_ELITE_INCLUSIVE", defaults.elite_inclusive)?,
            critical_override: flag_var(
                "ASSESSMENT_CRITICAL_OVERRIDE",
                defaults.critical_override,
            )?,
        };

        Ok(Self {
            classifier,
            key_path: optional_var("ASSESSMENT_KEY_PATH").map(PathBuf::from),
            store_path: optional_var("ASSESSMENT_STORE_PATH").map(PathBuf::from),
        })
    }

    /// The configured answer key, or the standard key when none is set.
    pub fn answer_key(&self) -> Result<AnswerKey, AnswerKeyError> {
        match &self.key_path {
            Some(path) => AnswerKey::from_path(path),
            None => Ok(AnswerKey::standard()),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn flag_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional_var(name) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value }),
        },
    }
}

fn number_var(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match optional_var(name) {
        None => Ok(default),
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMailPort,
    InvalidFlag { name: &'static str, value: String },
    InvalidNumber { name: &'static str, value: String },
    MissingRecipients,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMailPort => write!(f, "MAIL_PORT must be a valid u16"),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, found '{value}'")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer, found '{value}'")
            }
            ConfigError::MissingRecipients => {
                write!(f, "HR_EMAIL must list at least one recipient")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
