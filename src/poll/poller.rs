//! Generic repeating-fetch engine.
//!
//! A poller runs one fetch immediately, delivers the outcome to its
//! subscription, then sleeps for the configured interval and repeats.
//! The interval is measured from the END of each attempt, so a slow
//! fetch never stacks up concurrent requests.
//!
//! Stopping is cooperative via a [`PollStopper`]. A fetch that is in
//! flight when the poller is stopped gets dropped and its outcome is
//! never delivered.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::traits::FetchError;

// ============================================================================
// Ticks and policies
// ============================================================================

/// One delivery from a running poller.
#[derive(Debug, Clone)]
pub enum PollTick {
    /// The attempt succeeded; payload is the decoded response body
    /// (`Value::Null` when the body was empty or not JSON).
    Data(Value),
    /// The attempt failed but the poller keeps running.
    /// Only emitted under [`PollPolicy::ContinueOnError`].
    Degraded(FetchError),
}

impl PollTick {
    /// The payload of a `Data` tick.
    pub fn data(&self) -> Option<&Value> {
        match self {
            PollTick::Data(value) => Some(value),
            PollTick::Degraded(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, PollTick::Degraded(_))
    }
}

/// What a poller does when an attempt fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPolicy {
    /// Stop the loop. The failure is not delivered; the subscription
    /// just terminates.
    #[default]
    StopOnError,
    /// Deliver the failure as [`PollTick::Degraded`] and keep the
    /// schedule running.
    ContinueOnError,
}

// ============================================================================
// Stop handle
// ============================================================================

/// Cloneable handle that stops a poller.
///
/// `stop` is idempotent and safe to call from anywhere, including a
/// task that is consuming the subscription.
#[derive(Debug, Clone)]
pub struct PollStopper {
    cancel: CancellationToken,
}

impl PollStopper {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Receiving side of a running poller.
///
/// Yields [`PollTick`]s until the poller stops, then yields `None`.
/// Dropping the subscription also winds the poller down: the next
/// attempted delivery fails and the loop exits.
pub struct PollSubscription {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<PollTick>,
    stopper: PollStopper,
}

impl PollSubscription {
    /// Unique id of this poller, used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A stop handle that can outlive this subscription.
    pub fn stopper(&self) -> PollStopper {
        self.stopper.clone()
    }

    /// Stop the poller. Ticks already delivered remain readable;
    /// nothing new is produced.
    pub fn stop(&self) {
        self.stopper.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopper.is_stopped()
    }

    /// Wait for the next tick. `None` means the poller has stopped.
    pub async fn next_tick(&mut self) -> Option<PollTick> {
        self.rx.recv().await
    }
}

impl Stream for PollSubscription {
    type Item = PollTick;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl std::fmt::Debug for PollSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollSubscription")
            .field("id", &self.id)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Start a poller around `fetch`.
///
/// The first attempt begins immediately. Each later attempt starts
/// `interval` after the previous one finished, success or failure.
pub fn start<F, Fut>(fetch: F, interval: Duration, policy: PollPolicy) -> PollSubscription
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Value, FetchError>> + Send,
{
    let id = Uuid::new_v4();
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let loop_cancel = cancel.clone();
    tokio::spawn(async move {
        tracing::debug!(poller = %id, interval_ms = interval.as_millis() as u64, "poller started");

        loop {
            let outcome = tokio::select! {
                _ = loop_cancel.cancelled() => break,
                outcome = fetch() => outcome,
            };

            // An outcome that raced a concurrent stop is discarded.
            if loop_cancel.is_cancelled() {
                break;
            }

            match outcome {
                Ok(payload) => {
                    if tx.send(PollTick::Data(payload)).is_err() {
                        tracing::debug!(poller = %id, "subscription dropped, stopping poller");
                        break;
                    }
                }
                Err(err) => match policy {
                    PollPolicy::StopOnError => {
                        tracing::warn!(poller = %id, error = %err, "poll failed, stopping");
                        loop_cancel.cancel();
                        break;
                    }
                    PollPolicy::ContinueOnError => {
                        tracing::warn!(poller = %id, error = %err, "poll failed, continuing");
                        if tx.send(PollTick::Degraded(err)).is_err() {
                            break;
                        }
                    }
                },
            }

            tokio::select! {
                _ = loop_cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::debug!(poller = %id, "poller stopped");
    });

    PollSubscription {
        id,
        rx,
        stopper: PollStopper { cancel },
    }
}
