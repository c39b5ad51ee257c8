//! Engagement history table
//!
//! Rows keep the order the backend returned them in. Secret columns are
//! masked until the single table-wide reveal switch is flipped.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::types::{HistoryEntry, HistoryRow, SecretCell, VisibleHistoryRow};

const NOT_PROVIDED: &str = "Not provided";
const UNKNOWN: &str = "Unknown";
const NOT_SENT: &str = "Not sent";
const NONE: &str = "-";

fn format_time(ts: Option<DateTime<Utc>>, fallback: &str) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| fallback.to_string())
}

fn row_from_entry(entry: HistoryEntry) -> HistoryRow {
    let record = entry.record;
    HistoryRow {
        id: entry.id,
        email: if record.email.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            record.email
        },
        name: record.name,
        monitor_url: record.monitor_url,
        monitor_password: SecretCell::new(record.monitor_password),
        partner_api_key: SecretCell::new(record.partner_api_key),
        created_at: format_time(record.created_at, UNKNOWN),
        sent_at: format_time(record.sent_at, NOT_SENT),
        sent_by: record.sent_by.unwrap_or_else(|| NONE.to_string()),
        send_method: record.send_method.unwrap_or_else(|| NONE.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a raw history payload
///
/// Anything other than an array of well-formed entries is rejected as a
/// whole: a warning is logged and no rows are produced.
pub fn render(payload: &Value) -> Vec<HistoryRow> {
    let Some(items) = payload.as_array() else {
        warn!(kind = json_kind(payload), "Expected an array of history records");
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<HistoryEntry>(item.clone()) {
            Ok(entry) => rows.push(row_from_entry(entry)),
            // serde messages can quote field values, so only the position is logged
            Err(_) => {
                warn!(index, "Rejecting history payload, malformed record");
                return Vec::new();
            }
        }
    }
    rows
}

/// Rendered history with the table-wide reveal switch
#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
    revealed: bool,
}

impl HistoryTable {
    /// Replace every row; the reveal switch keeps its position
    pub fn replace(&mut self, rows: Vec<HistoryRow>) {
        self.rows = rows;
    }

    pub fn toggle_secrets(&mut self, reveal: bool) {
        self.revealed = reveal;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Label of the reveal button
    pub fn reveal_label(&self) -> &'static str {
        if self.revealed {
            "Hide passwords"
        } else {
            "Reveal passwords"
        }
    }

    /// Cells as they should appear on screen
    pub fn visible_rows(&self) -> Vec<VisibleHistoryRow> {
        self.rows
            .iter()
            .map(|row| VisibleHistoryRow {
                name: row.name.clone(),
                monitor_url: row.monitor_url.clone(),
                monitor_password: row.monitor_password.display(self.revealed).to_string(),
                partner_api_key: row.partner_api_key.display(self.revealed).to_string(),
                created_at: row.created_at.clone(),
                email: row.email.clone(),
                sent_at: row.sent_at.clone(),
                sent_by: row.sent_by.clone(),
                send_method: row.send_method.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn payload() -> Value {
        json!([
            {
                "id": 1,
                "name": "Acme",
                "email": "",
                "monitor_url": "https://acme.test/monitor",
                "monitor_password": "first-pw",
                "apolo_api_key": "key-1",
                "created_at": "2024-01-01T09:00:00Z",
                "sent_by": "Not sent",
                "send_method": "None"
            },
            {
                "id": 2,
                "name": "Acme Corp",
                "email": "sec@acme.test",
                "monitor_url": "https://acme.test/monitor",
                "monitor_password": "second-pw",
                "apolo_api_key": "key-2",
                "created_at": "2024-02-01T09:00:00Z",
                "sent_date": "2024-02-02T10:30:00Z",
                "sent_by": "Alice",
                "send_method": "Gophish"
            }
        ])
    }

    #[test]
    fn test_render_keeps_order_and_fallbacks() {
        let rows = render(&payload());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, Some(1));
        assert_eq!(rows[1].name, "Acme Corp");
        assert_eq!(rows[0].email, "Not provided");
        assert_eq!(rows[0].sent_at, "Not sent");
        assert_eq!(rows[0].sent_by, "-");
        assert_eq!(rows[1].sent_at, "2024-02-02 10:30:00 UTC");
        assert_eq!(rows[1].send_method, "Gophish");
    }

    #[test]
    fn test_non_array_payload_renders_nothing() {
        assert!(render(&json!({"success": false, "message": "boom"})).is_empty());
        assert!(render(&Value::Null).is_empty());
        assert!(render(&json!("rows")).is_empty());
    }

    #[test]
    fn test_one_bad_entry_rejects_everything() {
        let mut bad = payload();
        bad.as_array_mut().unwrap().push(json!(42));
        assert!(render(&bad).is_empty());
    }

    #[test]
    fn test_secrets_masked_until_revealed() {
        let mut table = HistoryTable::default();
        table.replace(render(&payload()));

        let masked = table.visible_rows();
        assert!(masked
            .iter()
            .all(|r| r.monitor_password == "**********" && r.partner_api_key == "**********"));
        assert_eq!(table.reveal_label(), "Reveal passwords");

        table.toggle_secrets(true);
        let shown = table.visible_rows();
        assert_eq!(shown[0].monitor_password, "first-pw");
        assert_eq!(shown[1].partner_api_key, "key-2");
        assert_eq!(table.reveal_label(), "Hide passwords");

        table.toggle_secrets(false);
        assert_eq!(table.visible_rows(), masked);
    }

    #[test]
    fn test_reveal_survives_reload() {
        let mut table = HistoryTable::default();
        table.toggle_secrets(true);
        table.replace(render(&payload()));
        assert_eq!(table.visible_rows()[0].monitor_password, "first-pw");
    }

    #[test]
    fn test_rejected_payload_keeps_secrets_out_of_logs() {
        let logs = captured_logs(|| {
            let single = json!({
                "name": "Acme",
                "monitor_password": "TOPSECRET-PW",
                "apolo_api_key": "TOPSECRET-KEY"
            });
            assert!(render(&single).is_empty());

            let bad_entry = json!([{"name": "Acme", "monitor_password": ["TOPSECRET-PW"]}]);
            assert!(render(&bad_entry).is_empty());
        });

        assert!(logs.contains("Expected an array of history records"));
        assert!(logs.contains("object"));
        assert!(logs.contains("malformed record"));
        assert!(!logs.contains("TOPSECRET"));
    }
}
