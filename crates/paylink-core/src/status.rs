//! Transaction Status
//!
//! Gateway-reported transaction states and the lenient parsing used to
//! read them out of the status endpoint's varying response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a submitted transaction as reported by the gateway.
///
/// From the poller's perspective transitions are monotonic: once `Paid`
/// or a failure-class status is observed, polling stops. `Unknown`
/// (missing or unparseable) is transient and keeps the loop running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Paid,
    Failed,
    Cancelled,
    Reversed,
    Error,
    Unknown,
}

impl TransactionStatus {
    /// Parse a status string, case-insensitive
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => TransactionStatus::Pending,
            "approved" => TransactionStatus::Approved,
            "paid" => TransactionStatus::Paid,
            "failed" => TransactionStatus::Failed,
            "cancelled" | "canceled" => TransactionStatus::Cancelled,
            "reversed" => TransactionStatus::Reversed,
            "error" => TransactionStatus::Error,
            _ => TransactionStatus::Unknown,
        }
    }

    /// Whether this status ends polling
    pub fn is_terminal(&self) -> bool {
        *self == TransactionStatus::Paid || self.is_failure()
    }

    /// Whether this status is failure-class
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Failed
                | TransactionStatus::Cancelled
                | TransactionStatus::Reversed
                | TransactionStatus::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Reversed => "reversed",
            TransactionStatus::Error => "error",
            TransactionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve the status field out of a status-endpoint response body.
///
/// The field is looked up across the shapes seen in the wild, first
/// match wins: `data.api_status`, `transaction.api_status`,
/// `api_status`, `status`. A missing or non-string field is `Unknown`.
pub fn status_from_value(body: &Value) -> TransactionStatus {
    let field = body
        .pointer("/data/api_status")
        .or_else(|| body.pointer("/transaction/api_status"))
        .or_else(|| body.get("api_status"))
        .or_else(|| body.get("status"));

    field
        .and_then(Value::as_str)
        .map(TransactionStatus::parse)
        .unwrap_or(TransactionStatus::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(TransactionStatus::parse("PAID"), TransactionStatus::Paid);
        assert_eq!(
            TransactionStatus::parse(" Reversed "),
            TransactionStatus::Reversed
        );
        assert_eq!(
            TransactionStatus::parse("gibberish"),
            TransactionStatus::Unknown
        );
    }

    #[test]
    fn test_terminal_classification() {
        assert!(TransactionStatus::Paid.is_terminal());
        assert!(TransactionStatus::Reversed.is_terminal());
        assert!(TransactionStatus::Reversed.is_failure());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::Approved.is_terminal());
        assert!(!TransactionStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_status_from_response_shapes() {
        assert_eq!(
            status_from_value(&json!({"data": {"api_status": "Paid"}})),
            TransactionStatus::Paid
        );
        assert_eq!(
            status_from_value(&json!({"transaction": {"api_status": "approved"}})),
            TransactionStatus::Approved
        );
        assert_eq!(
            status_from_value(&json!({"api_status": "pending"})),
            TransactionStatus::Pending
        );
        assert_eq!(
            status_from_value(&json!({"status": "failed"})),
            TransactionStatus::Failed
        );
    }

    #[test]
    fn test_first_matching_shape_wins() {
        let body = json!({
            "data": {"api_status": "paid"},
            "status": "pending",
        });
        assert_eq!(status_from_value(&body), TransactionStatus::Paid);
    }

    #[test]
    fn test_missing_field_is_unknown() {
        assert_eq!(
            status_from_value(&serde_json::json!({"message": "ok"})),
            TransactionStatus::Unknown
        );
        assert_eq!(
            status_from_value(&serde_json::json!({"status": 42})),
            TransactionStatus::Unknown
        );
    }
}
