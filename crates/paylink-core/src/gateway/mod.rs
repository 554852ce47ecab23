//! Gateway Abstractions
//!
//! Traits over the three outbound calls the payment flow depends on:
//! name verification, payment submission, and status reads. Implement
//! these for each processor; the HTTP implementations live in
//! `paylink-gateway`.

mod mock;

pub use mock::MockGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::phone::CanonicalPhone;
use crate::status::TransactionStatus;

/// Resolves a mobile number to the registered account name.
///
/// Best-effort: any miss is `None`, never an error. This is the only
/// outbound call permitted before the payer commits to paying, and it
/// must not touch the payee or the ledger.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn lookup(&self, phone: &CanonicalPhone) -> Option<String>;
}

/// The full payment request carried by one submission call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentSubmission {
    /// Payer's canonical mobile number
    pub mobile: String,

    /// Amount in whole UGX
    pub amount: u64,

    /// Free-text memo shown on the payer's statement
    pub memo: String,

    /// Recipient's opaque payment key
    pub payment_key: String,

    /// Recipient's canonical mobile number
    pub recipient: String,

    /// Client-generated idempotency reference
    pub reference: String,

    /// Payer's account display name
    pub recipient_name: String,

    /// Direction tag ("paylink")
    pub direction: String,

    /// Country tag ("UG")
    pub country: String,
}

/// Gateway acknowledgement of an accepted payment request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayAcceptance {
    /// Gateway-side transaction identifier, polled for confirmation
    pub transaction_id: String,

    /// Optional gateway message
    pub message: Option<String>,
}

/// Submits payment requests to the mobile-money processor.
///
/// Acceptance only means the request was queued; confirmation arrives
/// through the status source.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit(&self, submission: &PaymentSubmission) -> Result<GatewayAcceptance>;
}

/// Reads the current status of a submitted transaction.
///
/// A not-yet-visible record maps to `Pending`; transport and parse
/// failures are errors the poller absorbs as transient.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, transaction_id: &str) -> Result<TransactionStatus>;
}
