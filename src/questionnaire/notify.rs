//! Practitioner notification. Delivery is best effort: any failure degrades to
//! a [`DeliveryStatus::Manual`] that hands the message to the operator.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Serialize;

use super::report::Report;
use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn for_report(report: &Report) -> Self {
        let labels = report
            .classification
            .labels()
            .iter()
            .map(|label| label.code())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            subject: format!("Nouveau préquestionnaire – code {}", report.code),
            body: format!(
                "Un nouveau préquestionnaire de neurodiversité a été complété.\n\n\
                 Code d’accès : {}\n\
                 Patient : {}\n\
                 Date : {}\n\
                 Profil suggéré : {}\n\n\
                 Le rapport complet est consultable avec le code d’accès.\n",
                report.code,
                report.patient,
                report.timestamp(),
                labels
            ),
        }
    }
}

/// Outbound channel for practitioner notifications.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail delivery is not configured: {0}")]
    Configuration(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outcome reported to the caller of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    /// The message could not be sent and is returned for manual forwarding.
    Manual {
        reason: String,
        message: NotificationMessage,
    },
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent)
    }
}

/// SMTP delivery over STARTTLS through `lettre`.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn check_settings(&self) -> Result<(), DeliveryError> {
        match self.config.invalid_settings.as_slice() {
            [] => Ok(()),
            problems => Err(DeliveryError::Configuration(problems.join("; "))),
        }
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Message, DeliveryError> {
        let from = mailbox(self.config.from.as_deref(), "MAIL_FROM")?;
        let to = mailbox(self.config.practitioner.as_deref(), "PRACTITIONER_EMAIL")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|err| DeliveryError::Configuration(err.to_string()))
    }

    fn build_transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let host = self
            .config
            .smtp_host
            .as_deref()
            .ok_or_else(|| DeliveryError::Configuration("SMTP_HOST is not set".to_string()))?;

        let mut builder = SmtpTransport::starttls_relay(host)
            .map_err(|err| DeliveryError::Configuration(err.to_string()))?
            .port(self.config.smtp_port)
            .timeout(Some(self.config.timeout));

        match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }
            (None, None) => {}
            _ => {
                return Err(DeliveryError::Configuration(
                    "SMTP_USERNAME and SMTP_PASSWORD must be set together".to_string(),
                ))
            }
        }

        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        self.check_settings()?;
        let email = self.build_message(message)?;
        let transport = self.build_transport()?;
        transport
            .send(&email)
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        Ok(())
    }
}

fn mailbox(value: Option<&str>, variable: &str) -> Result<Mailbox, DeliveryError> {
    let address = value
        .ok_or_else(|| DeliveryError::Configuration(format!("{variable} is not set")))?;
    address
        .parse::<Mailbox>()
        .map_err(|err| DeliveryError::Configuration(format!("{variable} is invalid: {err}")))
}
