//! Unified error types for the panel
//!
//! This module defines error types that:
//! - Are serializable for whatever view renders the panel
//! - Keep local validation, remote rejection and transport failure apart
//! - Map internal errors to user-facing variants

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-level validation failure raised before any remote call
///
/// The display text is the exact message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("No IMAP Host specified")]
    MissingHost,

    #[error("No IMAP Port specified")]
    MissingPort,

    #[error("Invalid IMAP Port")]
    InvalidPort,

    #[error("Invalid IMAP Polling Frequency")]
    InvalidPollInterval,

    #[error("No specialist name specified")]
    MissingSpecialist,

    #[error("No SMTP profile selected")]
    MissingSmtpProfile,

    #[error("No client monitor URL specified")]
    MissingOutreachTarget,

    #[error("Client email and API key must be registered before sending")]
    OutreachNotAllowed,
}

/// Panel error type for commands and services
///
/// `Logical` and `Transport` must stay distinguishable: a rejected login is
/// not the same thing as an unreachable server.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PanelError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Logical(String),

    #[error("Unable to reach the server: {0}")]
    Transport(String),

    #[error("Request already in progress: {0}")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PanelError {
    /// Whether the remote call never completed
    pub fn is_transport(&self) -> bool {
        matches!(self, PanelError::Transport(_))
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        PanelError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        PanelError::Transport(err.to_string())
    }
}

/// Result type alias using PanelError
pub type Result<T> = std::result::Result<T, PanelError>;
