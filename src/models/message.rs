use serde::{Deserialize, Serialize};

/// An outgoing outreach email. Transient, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Outcome of sending a single message. Failures are carried here rather
/// than raised, so callers can render partial outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok(message_id: Option<String>) -> Self {
        SendResult {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        SendResult {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated outcome of one batch send.
///
/// Invariant: `sent + failed == total == results.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSendResult {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
    pub results: Vec<SendResult>,
}

impl BatchSendResult {
    /// Builds the aggregate from per-message outcomes. The batch counts as a
    /// success when at least one message went out; partial failure is
    /// reported, not escalated.
    pub fn from_results(results: Vec<SendResult>) -> Self {
        let sent = results.iter().filter(|r| r.success).count();
        let failed = results.len() - sent;
        BatchSendResult {
            success: sent > 0,
            sent,
            failed,
            total: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_add_up() {
        let results = vec![
            SendResult::ok(Some("id-1".to_string())),
            SendResult::failed("boom"),
            SendResult::ok(None),
        ];
        let batch = BatchSendResult::from_results(results);
        assert_eq!(batch.sent, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.total, 3);
        assert_eq!(batch.results.len(), 3);
        assert!(batch.success);
    }

    #[test]
    fn batch_with_no_successes_is_a_failure() {
        let batch = BatchSendResult::from_results(vec![
            SendResult::failed("a"),
            SendResult::failed("b"),
        ]);
        assert!(!batch.success);
        assert_eq!(batch.sent, 0);
        assert_eq!(batch.failed, 2);
    }

    #[test]
    fn empty_batch_is_a_failure() {
        let batch = BatchSendResult::from_results(Vec::new());
        assert!(!batch.success);
        assert_eq!(batch.total, 0);
    }

    #[test]
    fn message_wire_names_are_camel_case() {
        let msg = EmailMessage {
            to: "provider@example.com".to_string(),
            subject: "Care inquiry".to_string(),
            body: "Hello".to_string(),
            reply_to: Some("family@example.com".to_string()),
            from: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"replyTo\""));
        assert!(!json.contains("\"from\""));

        let result = SendResult::ok(Some("abc".to_string()));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"messageId\""));
    }
}
