//! Payment collaborator and submission bookkeeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use checkout_types::{PaymentError, PaymentRequest, Receipt, SubmissionTicket};
use checkout_util::{CheckoutConfig, PaymentOutcome};
use chrono::Utc;
use tracing::debug;

/// Something that can take a payment for a submitted form.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Take payment for `request`. Cancellation happens by dropping the future.
    async fn submit(&self, request: PaymentRequest) -> Result<Receipt, PaymentError>;
}

/// Gateway that waits a fixed delay and then succeeds or declines according
/// to configuration.
#[derive(Debug)]
pub struct SimulatedGateway {
    delay: Duration,
    outcome: PaymentOutcome,
    failure_message: String,
    issued: AtomicU64,
}

impl SimulatedGateway {
    pub fn new(delay: Duration, outcome: PaymentOutcome, failure_message: impl Into<String>) -> Self {
        Self {
            delay,
            outcome,
            failure_message: failure_message.into(),
            issued: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(config.submission_delay(), config.payment_outcome, config.failure_message.clone())
    }
}

#[async_trait::async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn submit(&self, request: PaymentRequest) -> Result<Receipt, PaymentError> {
        debug!(product = %request.product.name, delay_ms = self.delay.as_millis() as u64, "Simulating payment");
        tokio::time::sleep(self.delay).await;
        match self.outcome {
            PaymentOutcome::Succeed => {
                let sequence = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
                Ok(Receipt {
                    reference: format!("ORD-{sequence:06}"),
                    product: request.product,
                    settled_at: Utc::now(),
                })
            }
            PaymentOutcome::Fail => Err(PaymentError::Declined(self.failure_message.clone())),
        }
    }
}

/// Tracks the single submission that may be in flight.
///
/// Tickets increase monotonically and are never reissued, so a settlement for
/// a cancelled or superseded ticket is recognisable as stale.
#[derive(Debug, Default, Clone)]
pub struct SubmissionState {
    last_ticket: u64,
    pending: Option<SubmissionTicket>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket, or `None` while another submission is pending.
    pub fn begin(&mut self) -> Option<SubmissionTicket> {
        if self.pending.is_some() {
            return None;
        }
        self.last_ticket += 1;
        let ticket = SubmissionTicket(self.last_ticket);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Resolves the pending submission. Returns `false` for a stale ticket.
    pub fn settle(&mut self, ticket: SubmissionTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Drops the pending submission, returning its ticket.
    pub fn cancel(&mut self) -> Option<SubmissionTicket> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<SubmissionTicket> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_types::Product;
    use indexmap::IndexMap;

    fn request() -> PaymentRequest {
        PaymentRequest {
            product: Product::new("Widget", "$10"),
            fields: IndexMap::new(),
        }
    }

    #[test]
    fn only_one_submission_is_pending() {
        let mut state = SubmissionState::new();
        let first = state.begin().expect("first ticket");
        assert!(state.begin().is_none());
        assert!(state.settle(first));
        assert!(!state.settle(first));
        let second = state.begin().expect("second ticket");
        assert!(second > first);
    }

    #[test]
    fn cancelled_ticket_is_stale() {
        let mut state = SubmissionState::new();
        let ticket = state.begin().expect("ticket");
        assert_eq!(state.cancel(), Some(ticket));
        assert!(!state.settle(ticket));
        assert_eq!(state.pending(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_gateway_waits_then_succeeds() {
        let gateway = SimulatedGateway::new(Duration::from_millis(1500), PaymentOutcome::Succeed, "declined");
        let started = tokio::time::Instant::now();
        let receipt = gateway.submit(request()).await.expect("receipt");
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(receipt.reference, "ORD-000001");
        assert_eq!(receipt.product.name, "Widget");
        let next = gateway.submit(request()).await.expect("receipt");
        assert_eq!(next.reference, "ORD-000002");
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_gateway_declines_when_configured() {
        let gateway = SimulatedGateway::new(Duration::from_millis(10), PaymentOutcome::Fail, "Card declined");
        let error = gateway.submit(request()).await.expect_err("declined");
        assert_eq!(error, PaymentError::Declined("Card declined".into()));
    }
}
