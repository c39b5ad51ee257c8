//! Response and view types
//!
//! Backend acknowledgements on one side, and the lean view-facing structs
//! (badges, dialogs, table rows) the panel hands to its renderer.

use serde::{Deserialize, Serialize};

// ============================================================================
// Backend Response Types
// ============================================================================

/// Generic `{success, message}` acknowledgement used by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Acknowledgement of an outreach send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachReceipt {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Status Badge Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Negative,
    Warning,
}

/// Status indicator derived from the engagement record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub severity: Severity,
    pub text: String,
}

impl Badge {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

// ============================================================================
// Connection Test Dialog Types
// ============================================================================

/// Result dialog of a mailbox connection test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectionTestDialog {
    /// Server accepted the login
    Success { host: String },
    /// Server was reached but rejected the login or configuration
    Rejected { host: String, detail: String },
    /// The verification call itself did not complete
    Unreachable,
}

impl ConnectionTestDialog {
    pub fn title(&self) -> &'static str {
        match self {
            ConnectionTestDialog::Success { .. } => "Success",
            ConnectionTestDialog::Rejected { .. } | ConnectionTestDialog::Unreachable => "Failed!",
        }
    }

    pub fn body(&self) -> String {
        match self {
            ConnectionTestDialog::Success { host } => format!("Logged into {}", host),
            ConnectionTestDialog::Rejected { host, .. } => format!("Unable to login to {}.", host),
            ConnectionTestDialog::Unreachable => "An unexpected error occurred.".to_string(),
        }
    }

    /// Server-supplied error text behind the "More Info" button
    pub fn more_info(&self) -> Option<&str> {
        match self {
            ConnectionTestDialog::Rejected { detail, .. } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConnectionTestDialog::Success { .. })
    }
}

// ============================================================================
// History Table Types
// ============================================================================

/// A masked secret cell in the history table
#[derive(Clone, PartialEq, Eq)]
pub struct SecretCell {
    value: String,
}

impl std::fmt::Debug for SecretCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Self::MASK)
    }
}

impl SecretCell {
    pub const MASK: &'static str = "**********";

    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn display(&self, reveal: bool) -> &str {
        if reveal {
            &self.value
        } else {
            Self::MASK
        }
    }
}

/// One rendered history row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: Option<u64>,
    pub name: String,
    pub monitor_url: String,
    pub monitor_password: SecretCell,
    pub partner_api_key: SecretCell,
    pub created_at: String,
    pub email: String,
    pub sent_at: String,
    pub sent_by: String,
    pub send_method: String,
}

/// Row with secrets resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleHistoryRow {
    pub name: String,
    pub monitor_url: String,
    pub monitor_password: String,
    pub partner_api_key: String,
    pub created_at: String,
    pub email: String,
    pub sent_at: String,
    pub sent_by: String,
    pub send_method: String,
}
