//! Client engagement types
//!
//! The backend stores "no specialist" and "no channel" as the sentinel
//! strings `"Not sent"` and `"None"`. They are folded into `None` here, at
//! the deserialization boundary, and never appear elsewhere in the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intake::deserialize_optional_time;

const SENT_BY_SENTINEL: &str = "Not sent";
const SEND_METHOD_SENTINEL: &str = "None";

/// Current engagement record for the monitored client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EngagementWire")]
pub struct EngagementRecord {
    pub name: String,
    pub email: String,
    pub monitor_url: String,
    pub monitor_password: String,
    pub partner_api_key: String,
    /// Specialist who sent the outreach material
    pub sent_by: Option<String>,
    /// Channel the material went out on
    pub send_method: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl EngagementRecord {
    /// Sent only when both a specialist and a channel are recorded
    pub fn is_sent(&self) -> bool {
        self.sent_by.is_some() && self.send_method.is_some()
    }

    /// The backend answers an empty table with a blank record
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }

    /// Editable fields only, as posted to the backend
    pub fn draft(&self) -> EngagementDraft {
        EngagementDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            monitor_url: self.monitor_url.clone(),
            monitor_password: self.monitor_password.clone(),
            partner_api_key: self.partner_api_key.clone(),
        }
    }
}

/// Wire shape of `/api/client/` and `/api/client_history/` entries
#[derive(Debug, Clone, Deserialize)]
struct EngagementWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    monitor_url: String,
    #[serde(default)]
    monitor_password: String,
    #[serde(rename = "apolo_api_key", default)]
    partner_api_key: String,
    #[serde(default)]
    sent_by: Option<String>,
    #[serde(default)]
    send_method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    sent_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    created_at: Option<DateTime<Utc>>,
}

fn strip_sentinel(value: Option<String>, sentinel: &str) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != sentinel
    })
}

impl From<EngagementWire> for EngagementRecord {
    fn from(wire: EngagementWire) -> Self {
        Self {
            name: wire.name,
            email: wire.email,
            monitor_url: wire.monitor_url,
            monitor_password: wire.monitor_password,
            partner_api_key: wire.partner_api_key,
            sent_by: strip_sentinel(wire.sent_by, SENT_BY_SENTINEL),
            send_method: strip_sentinel(wire.send_method, SEND_METHOD_SENTINEL),
            sent_at: wire.sent_date,
            created_at: wire.created_at,
        }
    }
}

/// Editable engagement fields posted to `/api/client/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementDraft {
    pub name: String,
    pub email: String,
    pub monitor_url: String,
    pub monitor_password: String,
    #[serde(rename = "apolo_api_key")]
    pub partner_api_key: String,
}

/// One past version of the engagement record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub record: EngagementRecord,
}

/// Delivery channel for outreach material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutreachChannel {
    /// Sent through one of the panel's own SMTP sending profiles
    Gophish {
        smtp_profile_id: u32,
        email_template: String,
    },
    /// Handed to the partner service holding the client's API key
    Partner,
}

/// Everything needed to send outreach material to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachRequest {
    pub record: EngagementDraft,
    pub specialist_name: String,
    pub channel: OutreachChannel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> EngagementRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sentinels_become_absent() {
        let record = parse(r#"{"name": "Acme", "sent_by": "Not sent", "send_method": "None"}"#);
        assert_eq!(record.sent_by, None);
        assert_eq!(record.send_method, None);
        assert!(!record.is_sent());
    }

    #[test]
    fn test_partial_send_state_is_not_sent() {
        let record = parse(r#"{"name": "Acme", "sent_by": "Alice", "send_method": "None"}"#);
        assert_eq!(record.sent_by.as_deref(), Some("Alice"));
        assert!(!record.is_sent());
    }

    #[test]
    fn test_both_values_is_sent() {
        let record = parse(r#"{"name": "Acme", "sent_by": "Alice", "send_method": "Gophish"}"#);
        assert!(record.is_sent());
    }

    #[test]
    fn test_null_and_missing_fields() {
        let record = parse(r#"{"name": "Acme", "sent_by": null, "sent_date": null}"#);
        assert_eq!(record.sent_by, None);
        assert_eq!(record.sent_at, None);
        assert_eq!(record.partner_api_key, "");
    }

    #[test]
    fn test_partner_key_wire_name() {
        let record = parse(r#"{"name": "Acme", "apolo_api_key": "k-123"}"#);
        assert_eq!(record.partner_api_key, "k-123");

        let draft = serde_json::to_value(record.draft()).unwrap();
        assert_eq!(draft["apolo_api_key"], "k-123");
        assert!(draft.get("sent_by").is_none());
    }

    #[test]
    fn test_blank_record() {
        assert!(parse("{}").is_blank());
        assert!(!parse(r#"{"email": "a@b.c"}"#).is_blank());
    }

    #[test]
    fn test_history_entry_keeps_id() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"id": 7, "name": "Acme", "created_at": "2024-01-02T03:04:05Z"}"#)
                .unwrap();
        assert_eq!(entry.id, Some(7));
        assert_eq!(entry.record.name, "Acme");
        assert!(entry.record.created_at.is_some());
    }
}
