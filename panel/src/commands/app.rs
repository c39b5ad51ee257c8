use tracing::{info, warn};

use super::engagement::{load_engagement, load_history};
use super::intake::load_intake_settings;
use crate::state::{Panel, PanelSnapshot};
use crate::types::Result;

/// Initial load when the panel becomes visible
///
/// Fetches the intake configuration, the engagement history and the
/// engagement record, in that order. A failed fetch is reported through the
/// notifier and does not stop the others.
pub async fn activate(panel: &Panel) -> PanelSnapshot {
    info!("Activating panel");

    if let Err(e) = load_intake_settings(panel).await {
        warn!("Intake settings not loaded: {}", e);
    }
    if let Err(e) = load_history(panel).await {
        warn!("Engagement history not loaded: {}", e);
    }
    if let Err(e) = load_engagement(panel).await {
        warn!("Engagement record not loaded: {}", e);
    }

    panel.snapshot().await
}

/// Re-run the fetch + render pair of the intake tab
pub async fn refresh_intake_tab(panel: &Panel) -> Result<()> {
    load_intake_settings(panel).await.map(|_| ())
}

/// Re-run the fetch + render pairs of the engagement tab
pub async fn refresh_engagement_tab(panel: &Panel) -> Result<()> {
    let record = load_engagement(panel).await;
    let history = load_history(panel).await;
    record?;
    history.map(|_| ())
}
