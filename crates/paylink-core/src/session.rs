//! Payment Session
//!
//! Drives the amount → phone → account steps, submits the payment
//! request, and waits out the confirmation poll. One session per page
//! visit; the transaction reference is generated at construction and
//! reused across every retry within the session.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, RandomReferences, ReferenceSource, SystemClock};
use crate::error::{PaylinkError, Result};
use crate::gateway::{NameLookup, PaymentGateway, PaymentSubmission, StatusSource};
use crate::model::{PaidReceipt, PaymentIntent, SessionConfig, TxReference, UserProfile};
use crate::phone::{self, CanonicalPhone, Carrier};
use crate::poller::{poll_status, PollConfig, PollOutcome};
use crate::status::TransactionStatus;

/// Where the session currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Amount,
    Phone,
    Account,
    Submitting,
    WaitingConfirmation,
    Succeeded,
    Failed,
    TimedOut,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Amount => "amount",
            Step::Phone => "phone",
            Step::Account => "account",
            Step::Submitting => "submitting",
            Step::WaitingConfirmation => "waiting-for-confirmation",
            Step::Succeeded => "succeeded",
            Step::Failed => "failed",
            Step::TimedOut => "timed-out",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One payer's pass through the payment form
pub struct PaymentSession {
    profile: UserProfile,
    config: SessionConfig,
    step: Step,
    amount: Option<u64>,
    payer_phone: Option<CanonicalPhone>,
    prefilled_name: Option<String>,
    intent: Option<PaymentIntent>,
    reference: TxReference,
    transaction_id: Option<String>,
    receipt: Option<PaidReceipt>,
    clock: Arc<dyn Clock>,
}

impl PaymentSession {
    /// Create a session with system clock and random references
    pub fn new(profile: UserProfile, config: SessionConfig) -> Self {
        Self::with_sources(
            profile,
            config,
            Arc::new(SystemClock),
            Arc::new(RandomReferences),
        )
    }

    /// Create with injected clock and reference source
    pub fn with_sources(
        profile: UserProfile,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        references: Arc<dyn ReferenceSource>,
    ) -> Self {
        let step = if config.fixed_amount.is_some() && !config.start_on_amount {
            Step::Phone
        } else {
            Step::Amount
        };

        Self {
            profile,
            config,
            step,
            amount: None,
            payer_phone: None,
            prefilled_name: None,
            intent: None,
            reference: references.new_reference(),
            transaction_id: None,
            receipt: None,
            clock,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// The session's idempotency reference
    pub fn reference(&self) -> &TxReference {
        &self.reference
    }

    /// Amount committed so far (fixed or entered)
    pub fn amount(&self) -> Option<u64> {
        self.amount.or(self.config.fixed_amount)
    }

    /// Name prefilled by the verification lookup, if any
    pub fn prefilled_name(&self) -> Option<&str> {
        self.prefilled_name.as_deref()
    }

    /// The receipt, once the payment is confirmed
    pub fn receipt(&self) -> Option<&PaidReceipt> {
        self.receipt.as_ref()
    }

    fn expect_step(&self, expected: Step) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(PaylinkError::WrongStep {
                expected: expected.name(),
                actual: self.step.name(),
            })
        }
    }

    /// Commit the amount and advance to the phone step.
    ///
    /// Fixed-amount mode ignores the entered value and always advances.
    pub fn submit_amount(&mut self, amount: u64) -> Result<()> {
        self.expect_step(Step::Amount)?;

        if let Some(fixed) = self.config.fixed_amount {
            self.amount = Some(fixed);
            self.step = Step::Phone;
            return Ok(());
        }

        if amount < self.config.min_amount || amount > self.config.max_amount {
            return Err(PaylinkError::AmountOutOfRange {
                min: self.config.min_amount,
                max: self.config.max_amount,
            });
        }

        self.amount = Some(amount);
        self.step = Step::Phone;
        Ok(())
    }

    /// Normalize the payer's phone, run the best-effort name lookup, and
    /// advance to the account step.
    ///
    /// A lookup miss only means the name field starts empty; the step
    /// advances either way. Returns the advisory carrier hint.
    pub async fn submit_phone(&mut self, raw: &str, lookup: &dyn NameLookup) -> Result<Carrier> {
        self.expect_step(Step::Phone)?;

        let payer = phone::normalize(raw).ok_or(PaylinkError::InvalidPhone)?;

        match lookup.lookup(&payer).await {
            Some(name) => {
                tracing::debug!(phone = %payer, "Prefilled account name from lookup");
                self.prefilled_name = Some(name);
            }
            None => {
                tracing::debug!(phone = %payer, "Name lookup returned nothing");
            }
        }

        let carrier = phone::carrier_hint(&payer);
        self.payer_phone = Some(payer);
        self.step = Step::Account;
        Ok(carrier)
    }

    /// Validate the account step into a `PaymentIntent`.
    ///
    /// Any missing precondition is a validation error and the session
    /// stays at the account step.
    fn build_intent(&self, account_name: &str) -> Result<PaymentIntent> {
        let account_name = account_name.trim();
        if account_name.is_empty() {
            return Err(PaylinkError::MissingAccountName);
        }

        let payer_phone = self
            .payer_phone
            .clone()
            .ok_or(PaylinkError::InvalidPhone)?;

        let amount = self.amount().unwrap_or(0);
        if amount < self.config.min_amount {
            return Err(PaylinkError::AmountOutOfRange {
                min: self.config.min_amount,
                max: self.config.max_amount,
            });
        }

        if self.profile.payment_key.trim().is_empty() {
            return Err(PaylinkError::MissingPaymentKey);
        }

        Ok(PaymentIntent {
            amount,
            payer_phone,
            account_name: account_name.to_string(),
            reference: self.reference.clone(),
            recipient_phone: self.profile.phone.clone(),
        })
    }

    /// Submit the payment request.
    ///
    /// On gateway rejection or transport failure the session returns to
    /// the account step and the same reference is reused on resubmission,
    /// giving the gateway idempotency across retries. Acceptance moves to
    /// waiting-for-confirmation; success is never declared here.
    pub async fn submit_payment(
        &mut self,
        account_name: &str,
        gateway: &dyn PaymentGateway,
    ) -> Result<()> {
        self.expect_step(Step::Account)?;

        let intent = self.build_intent(account_name)?;
        self.step = Step::Submitting;

        let submission = PaymentSubmission {
            mobile: intent.payer_phone.as_str().to_string(),
            amount: intent.amount,
            memo: format!("Payment to {}", self.profile.name),
            payment_key: self.profile.payment_key.clone(),
            recipient: intent.recipient_phone.as_str().to_string(),
            reference: intent.reference.as_str().to_string(),
            recipient_name: intent.account_name.clone(),
            direction: self.config.direction.clone(),
            country: self.config.country.clone(),
        };

        tracing::info!(
            reference = %intent.reference,
            amount = intent.amount,
            "Submitting payment request"
        );

        match gateway.submit(&submission).await {
            Ok(acceptance) => {
                tracing::info!(
                    transaction_id = %acceptance.transaction_id,
                    "Payment request accepted, awaiting confirmation"
                );
                self.transaction_id = Some(acceptance.transaction_id);
                self.intent = Some(intent);
                self.step = Step::WaitingConfirmation;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Payment submission failed");
                self.step = Step::Account;
                Err(e)
            }
        }
    }

    /// Poll for confirmation until a terminal outcome.
    ///
    /// `Paid` builds the receipt and moves to succeeded; failure-class
    /// and timeout move to their terminal steps. Cancellation leaves the
    /// session waiting so the caller may resume or abandon it.
    pub async fn await_confirmation<F>(
        &mut self,
        source: &dyn StatusSource,
        poll: &PollConfig,
        on_tick: F,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome>
    where
        F: FnMut(TransactionStatus),
    {
        self.expect_step(Step::WaitingConfirmation)?;

        let transaction_id = self
            .transaction_id
            .clone()
            .ok_or_else(|| PaylinkError::Config("no transaction id to poll".into()))?;

        let outcome = poll_status(source, &transaction_id, poll, on_tick, cancel).await;

        match outcome {
            PollOutcome::Paid => {
                let intent = self
                    .intent
                    .clone()
                    .ok_or_else(|| PaylinkError::Config("no intent behind confirmation".into()))?;

                let provider_reference = (transaction_id != intent.reference.as_str())
                    .then_some(transaction_id);

                self.receipt = Some(PaidReceipt {
                    amount: intent.amount,
                    reference: intent.reference,
                    provider_reference,
                    paid_at: self.clock.now(),
                    payer_phone: intent.payer_phone,
                    recipient_phone: intent.recipient_phone,
                    recipient_name: self.profile.name.clone(),
                });
                self.step = Step::Succeeded;
            }
            PollOutcome::Failed(status) => {
                tracing::warn!(%status, "Payment confirmation failed");
                self.step = Step::Failed;
            }
            PollOutcome::TimedOut => {
                tracing::warn!("No payment confirmation within the deadline");
                self.step = Step::TimedOut;
            }
            PollOutcome::Cancelled => {}
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::phone::normalize;
    use chrono::TimeZone;
    use chrono::Utc;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Okello Crafts".into(),
            payment_key: "pk_live_okello".into(),
            phone: normalize("0772123456").unwrap(),
            handle: Some("okello".into()),
            avatar_url: None,
            verified: Some(true),
        }
    }

    fn session() -> PaymentSession {
        PaymentSession::new(profile(), SessionConfig::default())
    }

    async fn session_at_account(gateway: &MockGateway) -> PaymentSession {
        let mut session = session();
        session.submit_amount(5000).unwrap();
        session.submit_phone("0701234567", gateway).await.unwrap();
        session
    }

    #[test]
    fn test_amount_bounds() {
        let mut session = session();

        assert!(matches!(
            session.submit_amount(0),
            Err(PaylinkError::AmountOutOfRange { .. })
        ));
        assert_eq!(session.step(), Step::Amount);

        assert!(matches!(
            session.submit_amount(50_000_001),
            Err(PaylinkError::AmountOutOfRange { .. })
        ));
        assert_eq!(session.step(), Step::Amount);

        // The minimum itself advances.
        session.submit_amount(100).unwrap();
        assert_eq!(session.step(), Step::Phone);
    }

    #[test]
    fn test_fixed_amount_always_advances() {
        let config = SessionConfig {
            start_on_amount: true,
            ..SessionConfig::with_fixed_amount(2500)
        };
        let mut session = PaymentSession::new(profile(), config);

        assert_eq!(session.step(), Step::Amount);
        session.submit_amount(0).unwrap(); // displayed value is ignored
        assert_eq!(session.step(), Step::Phone);
        assert_eq!(session.amount(), Some(2500));
    }

    #[test]
    fn test_fixed_amount_skips_amount_step() {
        let session = PaymentSession::new(profile(), SessionConfig::with_fixed_amount(2500));
        assert_eq!(session.step(), Step::Phone);
    }

    #[tokio::test]
    async fn test_invalid_phone_does_not_advance() {
        let gateway = MockGateway::new();
        let mut session = session();
        session.submit_amount(5000).unwrap();

        let result = session.submit_phone("12345", &gateway).await;
        assert!(matches!(result, Err(PaylinkError::InvalidPhone)));
        assert_eq!(session.step(), Step::Phone);
    }

    #[tokio::test]
    async fn test_lookup_prefills_name() {
        let gateway = MockGateway::new().with_lookup_name("AMINA K");
        let mut session = session();
        session.submit_amount(5000).unwrap();

        let carrier = session.submit_phone("0701234567", &gateway).await.unwrap();
        assert_eq!(carrier, Carrier::Airtel);
        assert_eq!(session.prefilled_name(), Some("AMINA K"));
        assert_eq!(session.step(), Step::Account);
    }

    #[tokio::test]
    async fn test_lookup_miss_still_advances() {
        let gateway = MockGateway::new();
        let mut session = session();
        session.submit_amount(5000).unwrap();

        session.submit_phone("0701234567", &gateway).await.unwrap();
        assert!(session.prefilled_name().is_none());
        assert_eq!(session.step(), Step::Account);
    }

    #[tokio::test]
    async fn test_blank_account_name_rejected() {
        let gateway = MockGateway::new();
        let mut session = session_at_account(&gateway).await;

        let result = session.submit_payment("   ", &gateway).await;
        assert!(matches!(result, Err(PaylinkError::MissingAccountName)));
        assert_eq!(session.step(), Step::Account);
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_missing_payment_key_rejected() {
        let gateway = MockGateway::new();
        let mut bare = profile();
        bare.payment_key = String::new();

        let mut session = PaymentSession::new(bare, SessionConfig::default());
        session.submit_amount(5000).unwrap();
        session.submit_phone("0701234567", &gateway).await.unwrap();

        let result = session.submit_payment("AMINA K", &gateway).await;
        assert!(matches!(result, Err(PaylinkError::MissingPaymentKey)));
        assert_eq!(session.step(), Step::Account);
    }

    #[tokio::test]
    async fn test_accepted_submission_waits_for_confirmation() {
        let gateway = MockGateway::new();
        let mut session = session_at_account(&gateway).await;

        session.submit_payment("AMINA K", &gateway).await.unwrap();
        assert_eq!(session.step(), Step::WaitingConfirmation);
        assert!(session.receipt().is_none());

        let sent = gateway.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].mobile, "256701234567");
        assert_eq!(sent[0].recipient, "256772123456");
        assert_eq!(sent[0].amount, 5000);
        assert_eq!(sent[0].direction, "paylink");
        assert_eq!(sent[0].country, "UG");
    }

    #[tokio::test]
    async fn test_rejection_returns_to_account_and_reuses_reference() {
        let rejecting = MockGateway::new().rejecting("insufficient float");
        let mut session = session_at_account(&rejecting).await;

        let result = session.submit_payment("AMINA K", &rejecting).await;
        assert!(matches!(result, Err(PaylinkError::GatewayRejected(_))));
        assert_eq!(session.step(), Step::Account);

        // Retry goes out with the same idempotency reference.
        let _ = session.submit_payment("AMINA K", &rejecting).await;
        let sent = rejecting.submissions();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].reference, sent[1].reference);
    }

    #[tokio::test]
    async fn test_inputs_disabled_while_waiting() {
        let gateway = MockGateway::new();
        let mut session = session_at_account(&gateway).await;
        session.submit_payment("AMINA K", &gateway).await.unwrap();

        assert!(matches!(
            session.submit_amount(9000),
            Err(PaylinkError::WrongStep { .. })
        ));
        let phone_result = session.submit_phone("0772123456", &gateway).await;
        assert!(matches!(phone_result, Err(PaylinkError::WrongStep { .. })));
        let pay_result = session.submit_payment("AMINA K", &gateway).await;
        assert!(matches!(pay_result, Err(PaylinkError::WrongStep { .. })));
    }

    #[tokio::test]
    async fn test_confirmation_builds_receipt() {
        let gateway = MockGateway::new();
        gateway.push_status(TransactionStatus::Paid);

        let paid_at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let mut session = PaymentSession::with_sources(
            profile(),
            SessionConfig::default(),
            Arc::new(crate::clock::FixedClock(paid_at)),
            Arc::new(crate::clock::FixedReferences(TxReference::from_string(
                "11111111-2222-3333-4444-555555555555",
            ))),
        );
        session.submit_amount(5000).unwrap();
        session.submit_phone("0701234567", &gateway).await.unwrap();
        session.submit_payment("AMINA K", &gateway).await.unwrap();

        let cancel = CancellationToken::new();
        let outcome = session
            .await_confirmation(&gateway, &PollConfig::default(), |_| {}, &cancel)
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Paid);
        assert_eq!(session.step(), Step::Succeeded);

        let receipt = session.receipt().unwrap();
        assert_eq!(receipt.amount, 5000);
        assert_eq!(receipt.paid_at, paid_at);
        assert_eq!(receipt.recipient_name, "Okello Crafts");
        assert_eq!(
            receipt.reference.as_str(),
            "11111111-2222-3333-4444-555555555555"
        );
        assert!(receipt.provider_reference.is_some());
    }

    #[tokio::test]
    async fn test_failed_confirmation() {
        let gateway = MockGateway::new();
        gateway.push_status(TransactionStatus::Reversed);

        let mut session = session_at_account(&gateway).await;
        session.submit_payment("AMINA K", &gateway).await.unwrap();

        let cancel = CancellationToken::new();
        let outcome = session
            .await_confirmation(&gateway, &PollConfig::default(), |_| {}, &cancel)
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Failed(TransactionStatus::Reversed));
        assert_eq!(session.step(), Step::Failed);
        assert!(session.receipt().is_none());
    }
}
