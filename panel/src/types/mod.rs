//! Data structures shared by the services, the state and the API client

pub mod engagement;
pub mod error;
pub mod intake;
pub mod responses;

pub use engagement::{
    EngagementDraft, EngagementRecord, HistoryEntry, OutreachChannel, OutreachRequest,
};
pub use error::{PanelError, Result, ValidationError};
pub use intake::{
    ConnectionProbe, IntakeField, IntakeForm, MailIntakeConfig, DEFAULT_POLL_INTERVAL_SECS,
};
pub use responses::{
    ApiResponse, Badge, ConnectionTestDialog, HistoryRow, OutreachReceipt, SecretCell, Severity,
    VisibleHistoryRow,
};
