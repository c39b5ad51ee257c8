//! Backend API access
//!
//! [`RemoteApi`] is the seam between the panel and the admin backend. The
//! panel only ever talks to the trait; [`HttpApiClient`] is the production
//! implementation over the backend's REST endpoints.

mod http;

pub use http::HttpApiClient;

use async_trait::async_trait;

use crate::types::{
    ApiResponse, ConnectionProbe, EngagementDraft, EngagementRecord, MailIntakeConfig,
    OutreachReceipt, OutreachRequest, Result,
};

/// Typed request/response functions of the admin backend
///
/// Implementations report a call that did not complete as
/// `PanelError::Transport`, and a completed call the backend refused as
/// either `ApiResponse { success: false, .. }` or `PanelError::Logical`.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Current intake configuration, `None` when none is stored
    async fn fetch_intake_config(&self) -> Result<Option<MailIntakeConfig>>;

    async fn save_intake_config(&self, config: &MailIntakeConfig) -> Result<ApiResponse>;

    /// Ask the backend to log into the mailbox with the given settings
    async fn test_intake_connection(&self, probe: &ConnectionProbe) -> Result<ApiResponse>;

    /// Current engagement record, `None` when no client is registered
    async fn fetch_engagement_record(&self) -> Result<Option<EngagementRecord>>;

    async fn save_engagement_record(&self, draft: &EngagementDraft) -> Result<ApiResponse>;

    /// Raw history payload; its shape is checked by the history renderer
    async fn fetch_engagement_history(&self) -> Result<serde_json::Value>;

    async fn send_outreach_email(&self, request: &OutreachRequest) -> Result<OutreachReceipt>;
}
