use tracing::{debug, info, warn};

use super::UNREACHABLE_MESSAGE;
use crate::services::form;
use crate::state::Panel;
use crate::types::{
    ApiResponse, ConnectionTestDialog, IntakeForm, MailIntakeConfig, PanelError, Result,
};

const SAVED_MESSAGE: &str = "Successfully updated IMAP settings.";
const SAVE_REJECTED_MESSAGE: &str = "Unable to update IMAP settings.";
const FETCH_FAILED_MESSAGE: &str = "Error fetching IMAP settings";

/// Fetch the intake configuration and put it on screen
///
/// On failure the previous view is left as it was.
pub async fn load_intake_settings(panel: &Panel) -> Result<Option<MailIntakeConfig>> {
    match panel.api().fetch_intake_config().await {
        Ok(Some(config)) => {
            debug!(host = %config.host, enabled = config.enabled, "Loaded intake settings");
            panel.view().write().await.intake.apply_config(config.clone());
            Ok(Some(config))
        }
        Ok(None) => {
            debug!("No intake settings stored");
            panel.view().write().await.intake.config = None;
            Ok(None)
        }
        Err(e) => {
            warn!("Failed to fetch intake settings: {}", e);
            panel.notifier().error(FETCH_FAILED_MESSAGE);
            Err(e)
        }
    }
}

async fn reject_form(panel: &Panel, err: PanelError) -> PanelError {
    if let PanelError::Validation(v) = &err {
        panel.view().write().await.intake.inline_error = Some(v.to_string());
        panel.notifier().error(&v.to_string());
    }
    err
}

/// Validate and persist the intake form, then reload from the server
pub async fn save_intake_settings(panel: &Panel, form: IntakeForm) -> Result<ApiResponse> {
    panel.view().write().await.intake.form = form.clone();

    let config = match form::collect(&form) {
        Ok(config) => config,
        Err(e) => return Err(reject_form(panel, e.into()).await),
    };
    panel.view().write().await.intake.inline_error = None;

    let _flight = panel.intake_save().try_acquire()?;
    info!(host = %config.host, port = config.port, "Saving intake settings");

    match panel.api().save_intake_config(&config).await {
        Ok(resp) if resp.success => {
            panel.notifier().success(SAVED_MESSAGE);
            if let Err(e) = load_intake_settings(panel).await {
                warn!("Reload after save failed: {}", e);
            }
            Ok(resp)
        }
        Ok(resp) => {
            let message = if resp.message.is_empty() {
                SAVE_REJECTED_MESSAGE.to_string()
            } else {
                resp.message
            };
            panel.notifier().error(&message);
            Err(PanelError::Logical(message))
        }
        Err(PanelError::Logical(message)) => {
            panel.notifier().error(&message);
            Err(PanelError::Logical(message))
        }
        Err(e) => {
            warn!("Intake settings save did not complete: {}", e);
            panel.notifier().error(UNREACHABLE_MESSAGE);
            Err(e)
        }
    }
}

/// Run the connection test for the form on screen
///
/// The dialog is also kept in the panel state until dismissed.
pub async fn test_intake_connection(
    panel: &Panel,
    form: IntakeForm,
) -> Result<ConnectionTestDialog> {
    panel.view().write().await.intake.form = form.clone();

    match panel
        .connection_test()
        .test_connection(panel.api(), &form)
        .await
    {
        Ok(dialog) => {
            panel.view().write().await.intake.inline_error = None;
            Ok(dialog)
        }
        Err(e) => Err(reject_form(panel, e).await),
    }
}

/// Close the connection test result dialog
pub fn dismiss_connection_dialog(panel: &Panel) {
    panel.connection_test().dismiss();
}
