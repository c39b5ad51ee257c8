//! Panel state
//!
//! Owns the collaborators (backend API, notification sink), the view state
//! behind an async lock, and one guard per mutable entity. The lock is never
//! held across a remote call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::single_flight::SingleFlight;
use crate::api::RemoteApi;
use crate::services::helpers::relative_time;
use crate::services::outreach::{can_send_outreach, default_monitor_url, derive_status};
use crate::services::{ConnectionTestState, HistoryTable, MailIntakeValidator, Notifier};
use crate::types::{
    Badge, EngagementDraft, EngagementRecord, IntakeField, IntakeForm, MailIntakeConfig,
    VisibleHistoryRow,
};

/// Intake tab state
#[derive(Debug, Clone, Default)]
pub struct IntakeView {
    /// Last configuration the server returned
    pub config: Option<MailIntakeConfig>,
    /// Field values on screen
    pub form: IntakeForm,
    /// Field-level validation message
    pub inline_error: Option<String>,
}

impl IntakeView {
    /// Replace everything with the server's copy
    pub fn apply_config(&mut self, config: MailIntakeConfig) {
        self.form = IntakeForm::from(&config);
        self.config = Some(config);
        self.inline_error = None;
    }
}

/// Engagement tab state
#[derive(Debug, Clone, Default)]
pub struct EngagementView {
    pub record: Option<EngagementRecord>,
    pub draft: EngagementDraft,
    pub badges: Vec<Badge>,
    pub can_send: bool,
}

impl EngagementView {
    /// Replace everything with the server's copy and re-derive status
    pub fn apply_record(&mut self, record: Option<EngagementRecord>, panel_host: Option<&str>) {
        match &record {
            Some(r) => {
                self.draft = r.draft();
                self.badges = derive_status(r);
                self.can_send = can_send_outreach(r);
            }
            None => {
                self.draft = EngagementDraft::default();
                self.badges = Vec::new();
                self.can_send = false;
            }
        }

        if self.draft.monitor_url.is_empty() {
            if let Some(url) = panel_host.and_then(default_monitor_url) {
                self.draft.monitor_url = url;
            }
        }

        self.record = record;
    }
}

/// Mutable view state of the whole panel
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    pub intake: IntakeView,
    pub engagement: EngagementView,
    pub history: HistoryTable,
}

// ============================================================================
// Snapshots handed to the renderer
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    pub form: IntakeForm,
    pub configured: bool,
    pub show_last_login: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_login: Option<String>,
    pub inline_error: Option<String>,
    pub connection_test: ConnectionTestState,
    pub locked_fields: Vec<IntakeField>,
    pub test_button_label: String,
    pub saving: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngagementSnapshot {
    pub record: Option<EngagementRecord>,
    pub draft: EngagementDraft,
    pub badges: Vec<Badge>,
    pub can_send: bool,
    pub saving: bool,
    pub sending: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistorySnapshot {
    pub rows: Vec<VisibleHistoryRow>,
    pub revealed: bool,
    pub reveal_label: String,
}

/// Everything a renderer needs to draw the panel
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub intake: IntakeSnapshot,
    pub engagement: EngagementSnapshot,
    pub history: HistorySnapshot,
}

// ============================================================================
// Panel
// ============================================================================

pub struct Panel {
    api: Arc<dyn RemoteApi>,
    notifier: Arc<dyn Notifier>,
    view: RwLock<PanelView>,
    connection_test: MailIntakeValidator,
    intake_save: SingleFlight,
    engagement_save: SingleFlight,
    outreach_send: SingleFlight,
    panel_host: Option<String>,
}

impl Panel {
    pub fn new(api: Arc<dyn RemoteApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            view: RwLock::new(PanelView::default()),
            connection_test: MailIntakeValidator::new(),
            intake_save: SingleFlight::new("intake settings"),
            engagement_save: SingleFlight::new("engagement record"),
            outreach_send: SingleFlight::new("outreach email"),
            panel_host: None,
        }
    }

    /// Host the panel is served from, used for the default monitor URL
    pub fn with_panel_host(mut self, host: Option<String>) -> Self {
        self.panel_host = host.filter(|h| !h.trim().is_empty());
        self
    }

    pub fn api(&self) -> &dyn RemoteApi {
        self.api.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn connection_test(&self) -> &MailIntakeValidator {
        &self.connection_test
    }

    pub fn intake_save(&self) -> &SingleFlight {
        &self.intake_save
    }

    pub fn engagement_save(&self) -> &SingleFlight {
        &self.engagement_save
    }

    pub fn outreach_send(&self) -> &SingleFlight {
        &self.outreach_send
    }

    pub fn panel_host(&self) -> Option<&str> {
        self.panel_host.as_deref()
    }

    pub fn view(&self) -> &RwLock<PanelView> {
        &self.view
    }

    /// Render the current state
    pub async fn snapshot(&self) -> PanelSnapshot {
        let view = self.view.read().await;
        let test_state = self.connection_test.state();
        let now = Utc::now();

        let config = view.intake.config.as_ref();
        let last_login_at = config.and_then(|c| c.last_login_at);

        PanelSnapshot {
            intake: IntakeSnapshot {
                form: view.intake.form.clone(),
                configured: config.is_some(),
                show_last_login: config.map(|c| c.shows_last_login()).unwrap_or(false),
                last_login_at,
                last_login: last_login_at.map(|t| relative_time(t, now)),
                inline_error: view.intake.inline_error.clone(),
                locked_fields: test_state.locked_fields().to_vec(),
                test_button_label: test_state.button_label().to_string(),
                connection_test: test_state,
                saving: self.intake_save.is_busy(),
            },
            engagement: EngagementSnapshot {
                record: view.engagement.record.clone(),
                draft: view.engagement.draft.clone(),
                badges: view.engagement.badges.clone(),
                can_send: view.engagement.can_send,
                saving: self.engagement_save.is_busy(),
                sending: self.outreach_send.is_busy(),
            },
            history: HistorySnapshot {
                rows: view.history.visible_rows(),
                revealed: view.history.is_revealed(),
                reveal_label: view.history.reveal_label().to_string(),
            },
        }
    }
}
