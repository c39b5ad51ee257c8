use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::RemoteApi;
use crate::config::BackendConfig;
use crate::types::{
    ApiResponse, ConnectionProbe, EngagementDraft, EngagementRecord, MailIntakeConfig,
    OutreachChannel, OutreachReceipt, OutreachRequest, PanelError, Result,
};

const INTAKE_PATH: &str = "/api/imap/";
const INTAKE_VALIDATE_PATH: &str = "/api/imap/validate";
const CLIENT_PATH: &str = "/api/client/";
const CLIENT_HISTORY_PATH: &str = "/api/client_history/";
const SEND_GOPHISH_PATH: &str = "/api/send_email_gophish/";
const SEND_PARTNER_PATH: &str = "/api/send_email_apolo/";

/// Immutable snapshot of a backend connection.
/// To point at a different backend, build a new client.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

// -- Construction --

impl HttpApiClient {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| PanelError::Config(format!("invalid backend URL {}: {}", base_url, e)))?;

        let mut builder = Client::builder().timeout(Duration::from_secs(timeout_secs));

        if let Some(key) = api_key {
            let mut headers = reqwest::header::HeaderMap::new();
            if let Ok(val) = format!("Bearer {}", key).parse() {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| PanelError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.api_key.as_deref(),
            config.timeout_secs,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        debug!("GET {}", path);
        Ok(self.client.get(self.url(path)).send().await?)
    }

    async fn post<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        debug!("POST {}", path);
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }
}

// -- Response classification --

/// Read an acknowledgement. A `{success, message}` body counts as a
/// completed call whatever the status code; anything else on an error
/// status is a logical failure carrying the body text.
async fn read_ack(resp: Response) -> Result<ApiResponse> {
    let status = resp.status();
    let body = resp.text().await?;

    if let Ok(ack) = serde_json::from_str::<ApiResponse>(&body) {
        return Ok(ack);
    }

    if status.is_success() {
        return Err(PanelError::Transport(format!(
            "unexpected response from backend (HTTP {})",
            status
        )));
    }

    Err(logical_failure(status, &body))
}

/// Read a JSON payload from a successful response
async fn read_json(resp: Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        if let Ok(ack) = serde_json::from_str::<ApiResponse>(&body) {
            return Err(PanelError::Logical(ack.message));
        }
        return Err(logical_failure(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| PanelError::Transport(format!("malformed response body: {}", e)))
}

fn logical_failure(status: reqwest::StatusCode, body: &str) -> PanelError {
    let text = body.trim();
    if text.is_empty() {
        PanelError::Logical(format!("HTTP {}", status))
    } else {
        PanelError::Logical(text.to_string())
    }
}

fn outreach_payload(request: &OutreachRequest) -> Value {
    let record = &request.record;
    let mut payload = json!({
        "client_name": record.name,
        "client_email": record.email,
        "client_monitor_url": record.monitor_url,
        "client_monitor_password": record.monitor_password,
        "client_api_key": record.partner_api_key,
        "specialist_name": request.specialist_name,
    });

    match &request.channel {
        OutreachChannel::Gophish {
            smtp_profile_id,
            email_template,
        } => {
            payload["smtp_profile"] = json!(smtp_profile_id);
            payload["email_template"] = json!(email_template);
        }
        OutreachChannel::Partner => {
            payload["send_date"] = json!(chrono::Utc::now().to_rfc3339());
        }
    }

    payload
}

// -- RemoteApi --

#[async_trait]
impl RemoteApi for HttpApiClient {
    async fn fetch_intake_config(&self) -> Result<Option<MailIntakeConfig>> {
        let payload = read_json(self.get(INTAKE_PATH).await?).await?;
        let configs: Vec<MailIntakeConfig> = serde_json::from_value(payload)?;
        Ok(configs.into_iter().next())
    }

    async fn save_intake_config(&self, config: &MailIntakeConfig) -> Result<ApiResponse> {
        read_ack(self.post(INTAKE_PATH, config).await?).await
    }

    async fn test_intake_connection(&self, probe: &ConnectionProbe) -> Result<ApiResponse> {
        read_ack(self.post(INTAKE_VALIDATE_PATH, probe).await?).await
    }

    async fn fetch_engagement_record(&self) -> Result<Option<EngagementRecord>> {
        let payload = read_json(self.get(CLIENT_PATH).await?).await?;

        // "No clients registered." comes back as a rejected acknowledgement
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            debug!("No engagement record registered");
            return Ok(None);
        }

        let record: EngagementRecord = serde_json::from_value(payload)?;
        if record.is_blank() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn save_engagement_record(&self, draft: &EngagementDraft) -> Result<ApiResponse> {
        read_ack(self.post(CLIENT_PATH, draft).await?).await
    }

    async fn fetch_engagement_history(&self) -> Result<Value> {
        read_json(self.get(CLIENT_HISTORY_PATH).await?).await
    }

    async fn send_outreach_email(&self, request: &OutreachRequest) -> Result<OutreachReceipt> {
        let path = match request.channel {
            OutreachChannel::Gophish { .. } => SEND_GOPHISH_PATH,
            OutreachChannel::Partner => SEND_PARTNER_PATH,
        };

        let resp = self.post(path, &outreach_payload(request)).await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = %status, "Outreach send rejected");
            return Err(logical_failure(status, &body));
        }

        let receipt = serde_json::from_str::<OutreachReceipt>(&body).unwrap_or_else(|_| {
            OutreachReceipt {
                message: body.trim().to_string(),
            }
        });
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpApiClient::new("not a url", None, 5).err().unwrap();
        assert!(matches!(err, PanelError::Config(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpApiClient::new("http://localhost:3333/", None, 5).unwrap();
        assert_eq!(client.url(INTAKE_PATH), "http://localhost:3333/api/imap/");
    }

    #[test]
    fn test_gophish_payload_fields() {
        let request = OutreachRequest {
            record: EngagementDraft {
                name: "Acme".into(),
                email: "sec@acme.test".into(),
                monitor_url: "https://acme.test/monitor".into(),
                monitor_password: "pw".into(),
                partner_api_key: "key".into(),
            },
            specialist_name: "Alice".into(),
            channel: OutreachChannel::Gophish {
                smtp_profile_id: 3,
                email_template: "welcome".into(),
            },
        };
        let payload = outreach_payload(&request);
        assert_eq!(payload["client_api_key"], "key");
        assert_eq!(payload["smtp_profile"], 3);
        assert_eq!(payload["email_template"], "welcome");
        assert!(payload.get("send_date").is_none());
    }
}
