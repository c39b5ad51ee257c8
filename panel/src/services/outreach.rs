//! Engagement status and outreach gating
//!
//! Badges are derived from the persisted record only; the rules are
//! independent, so several badges can show at once. Order is fixed.

use crate::types::{
    Badge, EngagementRecord, OutreachChannel, OutreachRequest, Severity, ValidationError,
};

pub const SENT: &str = "Sent";
pub const NOT_SENT: &str = "Not sent";
pub const MISSING_EMAIL: &str = "Not registered client email";
pub const MISSING_MONITOR_PASSWORD: &str = "Not registered monitor password";
pub const MISSING_API_KEY: &str = "Not registered api key";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Status badges for an engagement record
pub fn derive_status(record: &EngagementRecord) -> Vec<Badge> {
    let mut badges = Vec::with_capacity(4);

    if record.is_sent() {
        badges.push(Badge::new(Severity::Positive, SENT));
    } else {
        badges.push(Badge::new(Severity::Negative, NOT_SENT));
    }

    if is_blank(&record.email) {
        badges.push(Badge::new(Severity::Warning, MISSING_EMAIL));
    }
    if is_blank(&record.monitor_password) {
        badges.push(Badge::new(Severity::Warning, MISSING_MONITOR_PASSWORD));
    }
    if is_blank(&record.partner_api_key) {
        badges.push(Badge::new(Severity::Warning, MISSING_API_KEY));
    }

    badges
}

/// Whether the "send via outreach channel" action is enabled
pub fn can_send_outreach(record: &EngagementRecord) -> bool {
    !is_blank(&record.email) && !is_blank(&record.partner_api_key)
}

/// Build and check an outreach request for the current record
pub fn build_request(
    record: &EngagementRecord,
    specialist_name: &str,
    channel: OutreachChannel,
) -> Result<OutreachRequest, ValidationError> {
    if !can_send_outreach(record) {
        return Err(ValidationError::OutreachNotAllowed);
    }
    if is_blank(&record.monitor_url) {
        return Err(ValidationError::MissingOutreachTarget);
    }
    if is_blank(specialist_name) {
        return Err(ValidationError::MissingSpecialist);
    }
    if let OutreachChannel::Gophish { smtp_profile_id, .. } = &channel {
        if *smtp_profile_id == 0 {
            return Err(ValidationError::MissingSmtpProfile);
        }
    }

    Ok(OutreachRequest {
        record: record.draft(),
        specialist_name: specialist_name.trim().to_string(),
        channel,
    })
}

/// Default client monitor URL for a panel served from `panel_host`
///
/// The monitor lives on the registrable domain (last two labels) of the
/// panel host.
pub fn default_monitor_url(panel_host: &str) -> Option<String> {
    let host = panel_host.trim().trim_end_matches('.');
    if host.is_empty() {
        return None;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    let domain = labels[start..].join(".");
    Some(format!("https://{}/monitor", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sent_by: Option<&str>, send_method: Option<&str>) -> EngagementRecord {
        EngagementRecord {
            name: "Acme".into(),
            email: "sec@acme.test".into(),
            monitor_url: "https://acme.test/monitor".into(),
            monitor_password: "pw".into(),
            partner_api_key: "key".into(),
            sent_by: sent_by.map(String::from),
            send_method: send_method.map(String::from),
            sent_at: None,
            created_at: None,
        }
    }

    fn texts(badges: &[Badge]) -> Vec<&str> {
        badges.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_not_sent_without_specialist_or_channel() {
        let badges = derive_status(&record(None, None));
        assert_eq!(badges, vec![Badge::new(Severity::Negative, "Not sent")]);
    }

    #[test]
    fn test_partial_state_is_not_sent() {
        assert_eq!(texts(&derive_status(&record(Some("Alice"), None))), vec!["Not sent"]);
        assert_eq!(texts(&derive_status(&record(None, Some("Gophish")))), vec!["Not sent"]);
    }

    #[test]
    fn test_sent_with_both() {
        let badges = derive_status(&record(Some("Alice"), Some("Gophish")));
        assert_eq!(badges, vec![Badge::new(Severity::Positive, "Sent")]);
    }

    #[test]
    fn test_sentinels_from_wire_are_not_sent() {
        let wire: EngagementRecord = serde_json::from_str(
            r#"{"name": "Acme", "email": "a@b.c", "sent_by": "Alice", "send_method": "None"}"#,
        )
        .unwrap();
        assert_eq!(derive_status(&wire)[0].text, "Not sent");
    }

    #[test]
    fn test_warnings_accumulate_in_order() {
        let empty = EngagementRecord::default();
        assert_eq!(
            texts(&derive_status(&empty)),
            vec![
                "Not sent",
                "Not registered client email",
                "Not registered monitor password",
                "Not registered api key",
            ]
        );
        assert!(derive_status(&empty)[1..]
            .iter()
            .all(|b| b.severity == Severity::Warning));
    }

    #[test]
    fn test_derive_status_is_idempotent() {
        let mut r = record(Some("Alice"), None);
        r.monitor_password.clear();
        assert_eq!(derive_status(&r), derive_status(&r));
    }

    #[test]
    fn test_send_gate() {
        let mut r = record(None, None);
        assert!(can_send_outreach(&r));

        r.partner_api_key.clear();
        assert!(!can_send_outreach(&r));

        let mut r = record(None, None);
        r.email.clear();
        assert!(!can_send_outreach(&r));

        // Monitor password does not gate sending
        let mut r = record(None, None);
        r.monitor_password.clear();
        assert!(can_send_outreach(&r));
    }

    #[test]
    fn test_build_request_checks() {
        let r = record(None, None);
        let gophish = |id| OutreachChannel::Gophish {
            smtp_profile_id: id,
            email_template: "welcome".into(),
        };

        assert_eq!(
            build_request(&r, "", gophish(1)),
            Err(ValidationError::MissingSpecialist)
        );
        assert_eq!(
            build_request(&r, "Alice", gophish(0)),
            Err(ValidationError::MissingSmtpProfile)
        );
        assert!(build_request(&r, "Alice", OutreachChannel::Partner).is_ok());

        let mut no_url = r.clone();
        no_url.monitor_url.clear();
        assert_eq!(
            build_request(&no_url, "Alice", gophish(1)),
            Err(ValidationError::MissingOutreachTarget)
        );

        let mut no_key = r.clone();
        no_key.partner_api_key.clear();
        assert_eq!(
            build_request(&no_key, "Alice", gophish(1)),
            Err(ValidationError::OutreachNotAllowed)
        );
    }

    #[test]
    fn test_default_monitor_url() {
        assert_eq!(
            default_monitor_url("admin.acme.example.com").as_deref(),
            Some("https://example.com/monitor")
        );
        assert_eq!(
            default_monitor_url("localhost").as_deref(),
            Some("https://localhost/monitor")
        );
        assert_eq!(default_monitor_url(""), None);
    }
}
