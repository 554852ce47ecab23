//! Status Poller
//!
//! Repeatedly reads a transaction's status with linear backoff until a
//! terminal status, the deadline, or cancellation. Single read in
//! flight at a time; ticks are delivered in issuance order and never
//! after cancellation or a terminal result.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::gateway::StatusSource;
use crate::status::TransactionStatus;

/// Poll loop tuning
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// First sleep between reads
    pub initial_interval: Duration,

    /// Added to the interval after every read
    pub interval_step: Duration,

    /// Interval ceiling
    pub max_interval: Duration,

    /// Overall deadline, measured from poll start
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(3),
            interval_step: Duration::from_secs(1),
            max_interval: Duration::from_secs(7),
            timeout: Duration::from_secs(180),
        }
    }
}

/// How a poll loop ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The gateway confirmed the payment
    Paid,

    /// The gateway reported a failure-class status
    Failed(TransactionStatus),

    /// No terminal status arrived within the deadline
    TimedOut,

    /// The external cancel signal fired
    Cancelled,
}

/// Poll the status source until a terminal outcome.
///
/// Each iteration reads the status once; a read error counts as a
/// transient `Unknown` observation and does not end the loop. Every
/// observation is reported through `on_tick` before the outcome is
/// decided, so the last tick of a successful poll is `Paid`.
pub async fn poll_status<F>(
    source: &dyn StatusSource,
    transaction_id: &str,
    config: &PollConfig,
    mut on_tick: F,
    cancel: &CancellationToken,
) -> PollOutcome
where
    F: FnMut(TransactionStatus),
{
    let deadline = Instant::now() + config.timeout;
    let mut interval = config.initial_interval;

    loop {
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        if Instant::now() >= deadline {
            return PollOutcome::TimedOut;
        }

        let status = match source.fetch_status(transaction_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(transaction_id, error = %e, "Transient status read failure");
                TransactionStatus::Unknown
            }
        };

        // The read may have raced the cancel signal; never tick after it.
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        tracing::debug!(transaction_id, %status, "Poll tick");
        on_tick(status);

        if status == TransactionStatus::Paid {
            return PollOutcome::Paid;
        }
        if status.is_failure() {
            return PollOutcome::Failed(status);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return PollOutcome::TimedOut;
        }

        tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(interval.min(remaining)) => {}
        }

        interval = (interval + config.interval_step).min(config.max_interval);
    }
}
