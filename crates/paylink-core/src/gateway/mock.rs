//! Mock Gateway
//!
//! For testing and demo purposes. Lookup and submission outcomes are
//! configured up front; status reads play back a scripted sequence.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GatewayAcceptance, NameLookup, PaymentGateway, PaymentSubmission, StatusSource};
use crate::error::{PaylinkError, Result};
use crate::phone::CanonicalPhone;
use crate::status::TransactionStatus;

/// Scripted gateway covering all three traits
pub struct MockGateway {
    lookup_name: Option<String>,
    reject_with: Option<String>,
    statuses: Mutex<VecDeque<Result<TransactionStatus>>>,
    submissions: Mutex<Vec<PaymentSubmission>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            lookup_name: None,
            reject_with: None,
            statuses: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Resolve every lookup to this name
    pub fn with_lookup_name(mut self, name: impl Into<String>) -> Self {
        self.lookup_name = Some(name.into());
        self
    }

    /// Decline every submission with this gateway message
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.reject_with = Some(message.into());
        self
    }

    /// Append a status for the next poll to observe
    pub fn push_status(&self, status: TransactionStatus) {
        self.statuses.lock().unwrap().push_back(Ok(status));
    }

    /// Append a transient read failure for the next poll to observe
    pub fn push_read_failure(&self) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Err(PaylinkError::Transport("connection reset".into())));
    }

    /// Submissions recorded so far, in order
    pub fn submissions(&self) -> Vec<PaymentSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl NameLookup for MockGateway {
    async fn lookup(&self, _phone: &CanonicalPhone) -> Option<String> {
        self.lookup_name.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn submit(&self, submission: &PaymentSubmission) -> Result<GatewayAcceptance> {
        self.submissions.lock().unwrap().push(submission.clone());

        if let Some(message) = &self.reject_with {
            return Err(PaylinkError::GatewayRejected(message.clone()));
        }

        Ok(GatewayAcceptance {
            transaction_id: format!("mock-{}", submission.reference),
            message: Some("queued".into()),
        })
    }
}

#[async_trait]
impl StatusSource for MockGateway {
    async fn fetch_status(&self, _transaction_id: &str) -> Result<TransactionStatus> {
        // Once the script runs dry, hold at pending.
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(TransactionStatus::Pending))
    }
}
