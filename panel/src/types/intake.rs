//! Mailbox intake configuration types
//!
//! `MailIntakeConfig` mirrors the backend's `/api/imap/` record. The form
//! snapshot holds raw field text; converting it into a config is the job of
//! the form controller.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Poll interval used when the operator leaves the field blank
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Persisted intake configuration (server is the source of truth)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailIntakeConfig {
    pub host: String,
    #[serde(with = "wire_number")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub ignore_cert_errors: bool,
    #[serde(default)]
    pub folder: String,
    #[serde(
        rename = "imap_freq",
        default = "default_poll_interval",
        with = "wire_number"
    )]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub restrict_domain: String,
    #[serde(default)]
    pub delete_reported_campaign_email: bool,
    #[serde(
        rename = "last_login",
        default,
        deserialize_with = "deserialize_optional_time",
        skip_serializing
    )]
    pub last_login_at: Option<DateTime<Utc>>,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Parse an optional RFC 3339 timestamp, treating null, empty strings and
/// the zero time (`0001-01-01T00:00:00Z`) as absent.
pub(crate) fn deserialize_optional_time<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .map_err(serde::de::Error::custom)?
        .with_timezone(&Utc);

    if parsed.year() <= 1 {
        return Ok(None);
    }
    Ok(Some(parsed))
}

/// Numbers the backend expects as JSON strings (`"993"`), accepted in
/// either form when reading.
mod wire_number {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        text.trim().parse().map_err(de::Error::custom)
    }
}

impl MailIntakeConfig {
    /// The subset sent to the validate endpoint
    pub fn probe(&self) -> ConnectionProbe {
        ConnectionProbe {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls,
            ignore_cert_errors: self.ignore_cert_errors,
        }
    }

    /// Whether the "last login" row should be visible
    pub fn shows_last_login(&self) -> bool {
        self.enabled
    }
}

/// Target sent to `POST /api/imap/validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProbe {
    pub host: String,
    #[serde(with = "wire_number")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: bool,
    pub ignore_cert_errors: bool,
}

/// Snapshot of the intake form exactly as the operator typed it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub tls: bool,
    pub ignore_cert_errors: bool,
    pub folder: String,
    pub poll_interval: String,
    pub restrict_domain: String,
    pub delete_reported_campaign_email: bool,
}

impl From<&MailIntakeConfig> for IntakeForm {
    fn from(config: &MailIntakeConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            enabled: config.enabled,
            tls: config.tls,
            ignore_cert_errors: config.ignore_cert_errors,
            folder: config.folder.clone(),
            poll_interval: config.poll_interval_secs.to_string(),
            restrict_domain: config.restrict_domain.clone(),
            delete_reported_campaign_email: config.delete_reported_campaign_email,
        }
    }
}

/// Intake form fields that get locked while a connection test runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    Host,
    Port,
    Username,
    Password,
    Enabled,
    Tls,
    IgnoreCertErrors,
    Folder,
    RestrictDomain,
    DeleteReportedCampaignEmail,
    LastLogin,
    PollInterval,
    TestButton,
}

impl IntakeField {
    pub const ALL: [IntakeField; 13] = [
        IntakeField::Host,
        IntakeField::Port,
        IntakeField::Username,
        IntakeField::Password,
        IntakeField::Enabled,
        IntakeField::Tls,
        IntakeField::IgnoreCertErrors,
        IntakeField::Folder,
        IntakeField::RestrictDomain,
        IntakeField::DeleteReportedCampaignEmail,
        IntakeField::LastLogin,
        IntakeField::PollInterval,
        IntakeField::TestButton,
    ];
}
