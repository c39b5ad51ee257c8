//! Business logic services
//!
//! This module contains view-agnostic logic that can be reused across
//! different front ends (web view, CLI, tests).
//!
//! Services should:
//! - Take immutable snapshots as parameters, never read shared view state
//! - Use PanelError / ValidationError for error handling
//! - Be easily testable in isolation

pub mod form;
pub mod helpers;
pub mod history;
pub mod logger;
pub mod notifier;
pub mod outreach;

pub use connection_test::{ConnectionTestState, MailIntakeValidator};
pub use history::HistoryTable;
pub use notifier::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
