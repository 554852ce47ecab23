//! HTTP Gateway
//!
//! `reqwest`-backed implementations of the core gateway traits against
//! the paylink API routes and the processor's status endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use paylink_core::{
    error::{PaylinkError, Result},
    gateway::{GatewayAcceptance, NameLookup, PaymentGateway, PaymentSubmission, StatusSource},
    phone::CanonicalPhone,
    status::{status_from_value, TransactionStatus},
};

use crate::config::GatewayConfig;

/// HTTP client over the verify, pay, and status endpoints
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Create a gateway with a fresh client honoring the config timeout
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaylinkError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    fn verify_url(&self) -> String {
        format!("{}/api/verify", self.config.base_url.trim_end_matches('/'))
    }

    fn pay_url(&self) -> String {
        format!("{}/api/pay", self.config.base_url.trim_end_matches('/'))
    }

    fn status_url(&self, transaction_id: &str) -> String {
        format!(
            "{}/{}",
            self.config.status_base.trim_end_matches('/'),
            transaction_id
        )
    }
}

#[derive(Serialize)]
struct VerifyBody<'a> {
    mobile: &'a str,
}

#[derive(Serialize)]
struct PayBody<'a> {
    mobile: &'a str,
    amount: u64,
    memo: &'a str,
    gutokey: &'a str,
    recipient: &'a str,
    tx: &'a str,
    recipient_name: &'a str,
    direction: &'a str,
    country: &'a str,
}

/// Pull the account name out of a verify response body
fn name_from_verify_body(body: &Value) -> Option<String> {
    body.pointer("/raw/contact/name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Parse the `munopay` envelope of a pay response
fn acceptance_from_pay_body(body: &Value) -> Result<GatewayAcceptance> {
    let envelope = body
        .get("munopay")
        .ok_or_else(|| PaylinkError::GatewayResponse("missing munopay envelope".into()))?;

    let status = envelope
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = envelope
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    if status != "success" {
        return Err(PaylinkError::GatewayRejected(
            message.unwrap_or_else(|| "payment request was not accepted".into()),
        ));
    }

    let transaction_id = envelope
        .get("transaction_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PaylinkError::GatewayResponse("missing transaction id".into()))?;

    Ok(GatewayAcceptance {
        transaction_id: transaction_id.to_string(),
        message,
    })
}

#[async_trait]
impl NameLookup for HttpGateway {
    /// Single attempt, no retries; every miss is `None`.
    async fn lookup(&self, phone: &CanonicalPhone) -> Option<String> {
        let response = self
            .client
            .post(self.verify_url())
            .json(&VerifyBody {
                mobile: phone.as_str(),
            })
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(status = %r.status(), "Verify endpoint returned non-success");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Verify request failed");
                return None;
            }
        };

        match response.json::<Value>().await {
            Ok(body) => name_from_verify_body(&body),
            Err(e) => {
                tracing::debug!(error = %e, "Verify response was not JSON");
                None
            }
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn submit(&self, submission: &PaymentSubmission) -> Result<GatewayAcceptance> {
        let body = PayBody {
            mobile: &submission.mobile,
            amount: submission.amount,
            memo: &submission.memo,
            gutokey: &submission.payment_key,
            recipient: &submission.recipient,
            tx: &submission.reference,
            recipient_name: &submission.recipient_name,
            direction: &submission.direction,
            country: &submission.country,
        };

        let response = self
            .client
            .post(self.pay_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaylinkError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaylinkError::Transport(format!(
                "pay endpoint returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PaylinkError::Transport(e.to_string()))?;

        acceptance_from_pay_body(&body)
    }
}

#[async_trait]
impl StatusSource for HttpGateway {
    /// 404 means the record is not visible yet and maps to `Pending`;
    /// any other non-success status is a transient read failure.
    async fn fetch_status(&self, transaction_id: &str) -> Result<TransactionStatus> {
        let response = self
            .client
            .get(self.status_url(transaction_id))
            .send()
            .await
            .map_err(|e| PaylinkError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TransactionStatus::Pending);
        }
        if !response.status().is_success() {
            return Err(PaylinkError::Transport(format!(
                "status endpoint returned {}",
                response.status()
            )));
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(status_from_value(&body)),
            Err(e) => {
                tracing::debug!(error = %e, "Status response was not JSON");
                Ok(TransactionStatus::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_from_verify_body() {
        let body = json!({"raw": {"contact": {"name": " AMINA K "}}});
        assert_eq!(name_from_verify_body(&body).as_deref(), Some("AMINA K"));
    }

    #[test]
    fn test_verify_misses() {
        for body in [
            json!({}),
            json!({"raw": {}}),
            json!({"raw": {"contact": {}}}),
            json!({"raw": {"contact": {"name": ""}}}),
            json!({"raw": {"contact": {"name": 7}}}),
        ] {
            assert!(name_from_verify_body(&body).is_none(), "body {:?}", body);
        }
    }

    #[test]
    fn test_pay_acceptance() {
        let body = json!({
            "munopay": {
                "status": "success",
                "message": "request queued",
                "transaction_id": "MP-2231",
            }
        });

        let acceptance = acceptance_from_pay_body(&body).unwrap();
        assert_eq!(acceptance.transaction_id, "MP-2231");
        assert_eq!(acceptance.message.as_deref(), Some("request queued"));
    }

    #[test]
    fn test_pay_rejection_carries_gateway_message() {
        let body = json!({
            "munopay": {"status": "failed", "message": "insufficient float"}
        });

        match acceptance_from_pay_body(&body) {
            Err(PaylinkError::GatewayRejected(msg)) => {
                assert_eq!(msg, "insufficient float");
            }
            other => panic!("expected rejection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_pay_missing_envelope() {
        assert!(matches!(
            acceptance_from_pay_body(&json!({"status": "success"})),
            Err(PaylinkError::GatewayResponse(_))
        ));
    }

    #[test]
    fn test_pay_missing_transaction_id() {
        let body = json!({"munopay": {"status": "success"}});
        assert!(matches!(
            acceptance_from_pay_body(&body),
            Err(PaylinkError::GatewayResponse(_))
        ));
    }

    #[test]
    fn test_url_shapes() {
        let gateway = HttpGateway::new(GatewayConfig {
            base_url: "https://guto.me/".into(),
            status_base: "https://pay.munopay.com/api/v1/transactions".into(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(gateway.verify_url(), "https://guto.me/api/verify");
        assert_eq!(gateway.pay_url(), "https://guto.me/api/pay");
        assert_eq!(
            gateway.status_url("MP-1"),
            "https://pay.munopay.com/api/v1/transactions/MP-1"
        );
    }
}
