use super::transaction::{Transaction, TransactionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single callback URL registered for the business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    pub url: String,
}

/// Body of a webhook delivery, parsed by the receiving service
///
/// Signature verification is left to the receiver.
// https://developer.revolut.com/docs/business/webhooks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum WebhookEvent {
    TransactionCreated {
        timestamp: DateTime<Utc>,
        data: Transaction,
    },
    TransactionStateChanged {
        timestamp: DateTime<Utc>,
        data: StateChange,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateChange {
    pub id: String,
    #[serde(default)]
    pub request_id: Option<String>,
    pub old_state: TransactionState,
    pub new_state: TransactionState,
}

impl WebhookEvent {
    /// ID of the transaction the event refers to
    pub fn transaction_id(&self) -> &str {
        match self {
            WebhookEvent::TransactionCreated { data, .. } => &data.id,
            WebhookEvent::TransactionStateChanged { data, .. } => &data.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::test_helpers::mock_transaction_json;
    use serde_json::json;

    #[test]
    fn test_transaction_created_event() {
        let body = json!({
            "event": "TransactionCreated",
            "timestamp": "2024-11-23T10:00:01.000Z",
            "data": mock_transaction_json("tx_1", "req_1")
        });

        let event: WebhookEvent = serde_json::from_value(body).unwrap();

        assert_eq!(event.transaction_id(), "tx_1");
        assert!(matches!(event, WebhookEvent::TransactionCreated { .. }));
    }

    #[test]
    fn test_state_changed_event() {
        let body = r#"{
            "event": "TransactionStateChanged",
            "timestamp": "2024-11-23T10:00:02.000Z",
            "data": {
                "id": "tx_1",
                "request_id": "req_1",
                "old_state": "pending",
                "new_state": "failed"
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();

        let WebhookEvent::TransactionStateChanged { data, .. } = event else {
            panic!("expected a state change");
        };
        assert_eq!(data.old_state, TransactionState::Pending);
        assert_eq!(data.new_state, TransactionState::Failed);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let body = r#"{"event": "PayoutLinkCreated", "timestamp": "2024-11-23T10:00:02Z", "data": {}}"#;
        assert!(serde_json::from_str::<WebhookEvent>(body).is_err());
    }
}
