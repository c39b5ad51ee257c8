//! Intake panel - mailbox intake and client engagement controller
//!
//! Headless controller for two pieces of operator-configured state of the
//! admin panel: the mailbox the backend polls for replies and bounces, and
//! the monitored client together with its outreach status.
//!
//! ## Module Organization
//!
//! - `commands/`: Hooks called by the surrounding panel (thin wrappers)
//! - `services/`: Validation, state machines and rendering logic
//! - `state/`: Panel view state and single-flight guards
//! - `types/`: Data structures and error types
//! - `api/`: Backend API trait and HTTP client
//! - `config/`: Configuration loading

pub mod api;
pub mod commands;
pub mod config;
pub mod services;
pub mod state;
pub mod types;

use std::sync::Arc;
use tracing::info;

use api::HttpApiClient;
use config::PanelConfig;
use services::Notifier;
use state::{Panel, PanelSnapshot};
use types::Result;

/// Build a panel talking to the configured backend
pub fn build_panel(config: &PanelConfig, notifier: Arc<dyn Notifier>) -> Result<Panel> {
    let api = HttpApiClient::from_config(&config.backend)?;
    info!(backend = %config.backend.base_url, "Backend configured");
    Ok(Panel::new(Arc::new(api), notifier).with_panel_host(config.panel_host.clone()))
}

/// Build a panel and run the activation sequence
pub async fn run(config: &PanelConfig, notifier: Arc<dyn Notifier>) -> Result<PanelSnapshot> {
    let panel = build_panel(config, notifier)?;
    Ok(commands::activate(&panel).await)
}
