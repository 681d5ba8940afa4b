use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub storage: StorageConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let reports_dir = env::var("APP_REPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("reports"));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            storage: StorageConfig { reports_dir },
            mail: MailConfig::from_env(),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output style of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "full" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Location of the write-once report artifacts.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub reports_dir: PathBuf,
}

/// SMTP settings for practitioner notifications.
///
/// Nothing here fails a config load: missing or malformed values surface as a
/// delivery configuration error when a message is actually sent.
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub practitioner: Option<String>,
    pub timeout: Duration,
    /// Settings present in the environment but unparseable. Reported when a
    /// message is sent; the defaults are used meanwhile.
    pub invalid_settings: Vec<String>,
}

impl MailConfig {
    const DEFAULT_SMTP_PORT: u16 = 587;
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    fn from_env() -> Self {
        let mut invalid_settings = Vec::new();

        let smtp_port = match non_empty_var("SMTP_PORT") {
            None => Self::DEFAULT_SMTP_PORT,
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                invalid_settings.push(format!("SMTP_PORT must be a valid u16, got '{raw}'"));
                Self::DEFAULT_SMTP_PORT
            }),
        };

        let timeout_secs = match non_empty_var("SMTP_TIMEOUT_SECS") {
            None => Self::DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                invalid_settings.push(format!(
                    "SMTP_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ));
                Self::DEFAULT_TIMEOUT_SECS
            }),
        };

        Self {
            smtp_host: non_empty_var("SMTP_HOST"),
            smtp_port,
            username: non_empty_var("SMTP_USERNAME"),
            password: non_empty_var("SMTP_PASSWORD"),
            from: non_empty_var("MAIL_FROM"),
            practitioner: non_empty_var("PRACTITIONER_EMAIL"),
            timeout: Duration::from_secs(timeout_secs),
            invalid_settings,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "APP_REPORTS_DIR",
            "SMTP_HOST",
            "SMTP_PORT",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
            "SMTP_TIMEOUT_SECS",
            "MAIL_FROM",
            "PRACTITIONER_EMAIL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.storage.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.timeout, Duration::from_secs(10));
        assert!(config.mail.smtp_host.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn blank_mail_settings_are_treated_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SMTP_HOST", "   ");
        env::set_var("PRACTITIONER_EMAIL", "cabinet@example.org");
        let config = AppConfig::load().expect("config loads");
        assert!(config.mail.smtp_host.is_none());
        assert_eq!(
            config.mail.practitioner.as_deref(),
            Some("cabinet@example.org")
        );
    }

    #[test]
    fn malformed_smtp_numbers_are_recorded_not_fatal() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SMTP_PORT", "smtp");
        env::set_var("SMTP_TIMEOUT_SECS", "x");
        let config = AppConfig::load().expect("mail settings never block loading");
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.timeout, Duration::from_secs(10));
        assert_eq!(config.mail.invalid_settings.len(), 2);
        assert!(config.mail.invalid_settings[0].contains("SMTP_PORT"));
        assert!(config.mail.invalid_settings[1].contains("SMTP_TIMEOUT_SECS"));
        reset_env();
    }

    #[test]
    fn rejects_invalid_app_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "http");
        let error = AppConfig::load().expect_err("invalid port rejected");
        assert!(matches!(error, ConfigError::InvalidPort));
        reset_env();
    }
}
