use tracing::{debug, info, warn};

use super::UNREACHABLE_MESSAGE;
use crate::services::{history, outreach};
use crate::state::Panel;
use crate::types::{
    ApiResponse, EngagementDraft, EngagementRecord, OutreachChannel, OutreachReceipt, PanelError,
    Result,
};

const NO_CLIENT_MESSAGE: &str = "No clients registered.";
const FETCH_FAILED_MESSAGE: &str = "Error fetching client data.";
const SAVE_FAILED_MESSAGE: &str = "Error saving client data.";
const HISTORY_FAILED_MESSAGE: &str = "Error fetching client history data";
const SENT_MESSAGE: &str = "Email sent successfully";

/// Fetch the engagement record and re-derive its status badges
///
/// On failure the previous view is left as it was.
pub async fn load_engagement(panel: &Panel) -> Result<Option<EngagementRecord>> {
    let record = match panel.api().fetch_engagement_record().await {
        Ok(record) => record,
        Err(e) => {
            warn!("Failed to fetch engagement record: {}", e);
            panel.notifier().error(FETCH_FAILED_MESSAGE);
            return Err(e);
        }
    };

    if record.is_none() {
        panel.notifier().error(NO_CLIENT_MESSAGE);
    }

    panel
        .view()
        .write()
        .await
        .engagement
        .apply_record(record.clone(), panel.panel_host());
    Ok(record)
}

/// Fetch the engagement history and re-render the table
pub async fn load_history(panel: &Panel) -> Result<usize> {
    let payload = match panel.api().fetch_engagement_history().await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to fetch engagement history: {}", e);
            panel.notifier().error(HISTORY_FAILED_MESSAGE);
            return Err(e);
        }
    };

    let rows = history::render(&payload);
    let count = rows.len();
    panel.view().write().await.history.replace(rows);
    debug!(rows = count, "Rendered engagement history");
    Ok(count)
}

/// Reload record and history after a write; failures are already notified
async fn reload_engagement_tab(panel: &Panel) {
    if let Err(e) = load_engagement(panel).await {
        warn!("Reload of engagement record failed: {}", e);
    }
    if let Err(e) = load_history(panel).await {
        warn!("Reload of engagement history failed: {}", e);
    }
}

/// Persist the engagement form, then reload record and history
pub async fn save_engagement(panel: &Panel, draft: EngagementDraft) -> Result<ApiResponse> {
    panel.view().write().await.engagement.draft = draft.clone();

    let _flight = panel.engagement_save().try_acquire()?;
    info!(client = %draft.name, "Saving engagement record");

    match panel.api().save_engagement_record(&draft).await {
        Ok(resp) if resp.success => {
            panel.notifier().success(&resp.message);
            reload_engagement_tab(panel).await;
            Ok(resp)
        }
        Ok(resp) => {
            panel.notifier().error(&resp.message);
            Err(PanelError::Logical(resp.message))
        }
        Err(PanelError::Logical(message)) => {
            panel.notifier().error(&message);
            Err(PanelError::Logical(message))
        }
        Err(e) => {
            warn!("Engagement save did not complete: {}", e);
            panel.notifier().error(SAVE_FAILED_MESSAGE);
            Err(e)
        }
    }
}

/// Throw away local edits by reloading the record from the server
pub async fn cancel_engagement_edits(panel: &Panel) -> Result<Option<EngagementRecord>> {
    load_engagement(panel).await
}

/// Show or mask every secret cell of the history table at once
pub async fn toggle_history_secrets(panel: &Panel, reveal: bool) {
    panel.view().write().await.history.toggle_secrets(reveal);
}

/// Send outreach material for the persisted record
pub async fn send_outreach(
    panel: &Panel,
    specialist_name: &str,
    channel: OutreachChannel,
) -> Result<OutreachReceipt> {
    let record = panel
        .view()
        .read()
        .await
        .engagement
        .record
        .clone()
        .ok_or_else(|| PanelError::InvalidInput(NO_CLIENT_MESSAGE.to_string()))?;

    let request = match outreach::build_request(&record, specialist_name, channel) {
        Ok(request) => request,
        Err(e) => {
            panel.notifier().error(&e.to_string());
            return Err(e.into());
        }
    };

    let _flight = panel.outreach_send().try_acquire()?;
    info!(client = %record.name, specialist = %request.specialist_name, "Sending outreach email");

    match panel.api().send_outreach_email(&request).await {
        Ok(receipt) => {
            if receipt.message.is_empty() {
                panel.notifier().success(SENT_MESSAGE);
            } else {
                panel.notifier().success(&receipt.message);
            }
            reload_engagement_tab(panel).await;
            Ok(receipt)
        }
        Err(PanelError::Logical(message)) => {
            panel.notifier().error(&message);
            Err(PanelError::Logical(message))
        }
        Err(e) => {
            warn!("Outreach send did not complete: {}", e);
            panel.notifier().error(UNREACHABLE_MESSAGE);
            Err(e)
        }
    }
}
