//! Domain Models
//!
//! Core data types for the payment link flow. Amounts are whole Ugandan
//! shillings (`u64`); UGX has no minor units in this flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::phone::CanonicalPhone;

/// The merchant profile backing a payment page.
///
/// Immutable; supplied externally per page view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Opaque recipient identifier for the payment gateway
    pub payment_key: String,

    /// Recipient's canonical mobile number
    pub phone: CanonicalPhone,

    /// Page handle (without the leading '@')
    pub handle: Option<String>,

    /// Avatar image URL
    pub avatar_url: Option<String>,

    /// Whether the profile has been verified
    pub verified: Option<bool>,
}

/// Client-generated transaction reference.
///
/// Generated once per form session and reused across retries within that
/// session; the gateway's idempotency key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxReference(String);

impl TxReference {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TxReference {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TxReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully validated payment request, ready for submission
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Amount in whole UGX
    pub amount: u64,

    /// Payer's canonical mobile number
    pub payer_phone: CanonicalPhone,

    /// Payer's account display name
    pub account_name: String,

    /// Client-generated idempotency reference
    pub reference: TxReference,

    /// Recipient's canonical mobile number
    pub recipient_phone: CanonicalPhone,
}

/// Record of a confirmed payment.
///
/// Built exactly once, after the poller observes `paid`; drives receipt
/// rendering. Not persisted anywhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaidReceipt {
    /// Amount in whole UGX
    pub amount: u64,

    /// Client-generated transaction reference
    pub reference: TxReference,

    /// Gateway-side transaction identifier, when it differs
    pub provider_reference: Option<String>,

    /// Confirmation timestamp
    pub paid_at: DateTime<Utc>,

    /// Payer's mobile number
    pub payer_phone: CanonicalPhone,

    /// Recipient's mobile number
    pub recipient_phone: CanonicalPhone,

    /// Recipient display name
    pub recipient_name: String,
}

/// Per-session configuration supplied by the page
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minimum accepted amount in UGX
    pub min_amount: u64,

    /// Maximum accepted amount in UGX
    pub max_amount: u64,

    /// Externally fixed amount; skips amount validation when set
    pub fixed_amount: Option<u64>,

    /// Start on the amount step even when a fixed amount is present
    pub start_on_amount: bool,

    /// Country tag sent with the payment request
    pub country: String,

    /// Direction tag sent with the payment request
    pub direction: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_amount: 100,
            max_amount: 50_000_000,
            fixed_amount: None,
            start_on_amount: false,
            country: "UG".into(),
            direction: "paylink".into(),
        }
    }
}

impl SessionConfig {
    /// Configuration for a link that carries a prefilled amount
    pub fn with_fixed_amount(amount: u64) -> Self {
        Self {
            fixed_amount: Some(amount),
            ..Default::default()
        }
    }
}
