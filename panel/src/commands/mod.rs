//! Panel command handlers
//!
//! The hooks the surrounding admin panel calls, organized by tab.
//! Commands are thin: they delegate checks to services, talk to the backend
//! through the panel's `RemoteApi`, update the view and report through the
//! notifier.
//!
//! ## Module Organization
//!
//! - `app`: View activation and per-tab refresh
//! - `intake`: Mailbox intake settings and connection test
//! - `engagement`: Client record, history table and outreach

pub mod app;
pub mod engagement;
pub mod intake;

// Re-export all commands for convenience
pub use app::*;
pub use engagement::*;
pub use intake::*;

/// Shown when a remote call did not complete
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach the server.";
