//! Execution context handed to a running unit.
//!
//! The context is the unit's only channel to the outside world while
//! it runs: it emits intermediate `running` events and observes
//! cooperative cancellation. Terminal events are out of the unit's
//! reach — the engine synthesizes the single terminal event from the
//! unit's return value, which is what makes the "exactly one terminal
//! event" invariant structural rather than conventional.

use parking_lot::Mutex;
use relay_types::ProgressEvent;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc;

/// Running-event fractions are capped just below 1.0; the full 1.0 is
/// reserved for the terminal event.
const RUNNING_CAP: f64 = 0.99;

/// The event stream was closed by the engine (caller disconnected or
/// the execution was detached after a deadline).
///
/// Units should treat this as a cancellation request: release external
/// resources and return promptly. Partial side effects already
/// performed are not rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("execution cancelled: event stream closed")]
pub struct Cancelled;

/// Emission handle for one execution.
///
/// Constructed by the engine per invocation, borrowed by the unit for
/// the duration of [`crate::Runnable::run`].
///
/// # Progress Contract
///
/// Fractions should be monotonically non-decreasing. The context
/// clamps each fraction into `[0.0, 0.99]` and logs (but forwards) a
/// regression below the watermark — the contract is soft, enforced by
/// convention rather than by rejecting events.
#[derive(Debug)]
pub struct ExecContext {
    tx: mpsc::Sender<ProgressEvent>,
    watermark: Mutex<f64>,
}

impl ExecContext {
    /// Creates a context emitting into the engine's event channel.
    #[must_use]
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            tx,
            watermark: Mutex::new(0.0),
        }
    }

    /// Emits an intermediate `running` event.
    ///
    /// Suspends when the channel is full (backpressure), preserving
    /// emission order.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] once the stream is closed.
    pub async fn progress(&self, message: impl Into<String>, fraction: f64) -> Result<(), Cancelled> {
        self.emit(ProgressEvent::running(message, self.cap(fraction)))
            .await
    }

    /// Emits a `running` event with a command-specific data payload.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] once the stream is closed.
    pub async fn progress_with_data(
        &self,
        message: impl Into<String>,
        fraction: f64,
        data: Map<String, Value>,
    ) -> Result<(), Cancelled> {
        self.emit(ProgressEvent::running(message, self.cap(fraction)).with_payload(data))
            .await
    }

    /// Returns `true` once the caller has abandoned the execution.
    ///
    /// Cooperative: long-lived units should poll this (or just emit
    /// progress and handle [`Cancelled`]) at natural suspension
    /// points.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }

    async fn emit(&self, event: ProgressEvent) -> Result<(), Cancelled> {
        self.tx.send(event).await.map_err(|_| Cancelled)
    }

    fn cap(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, RUNNING_CAP);
        let mut watermark = self.watermark.lock();
        if fraction < *watermark {
            tracing::warn!(
                fraction,
                watermark = *watermark,
                "progress regressed; forwarding anyway"
            );
        } else {
            *watermark = fraction;
        }
        fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::EventStatus;

    #[tokio::test]
    async fn progress_emits_running_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);

        ctx.progress("step 1", 0.25).await.expect("open stream");

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.status, EventStatus::Running);
        assert_eq!(ev.message, "step 1");
        assert_eq!(ev.progress, 0.25);
    }

    #[tokio::test]
    async fn fraction_capped_below_terminal() {
        let (tx, mut rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);

        ctx.progress("almost", 1.0).await.expect("open stream");
        assert_eq!(rx.recv().await.expect("event").progress, RUNNING_CAP);
    }

    #[tokio::test]
    async fn regression_forwarded_not_rejected() {
        let (tx, mut rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);

        ctx.progress("a", 0.8).await.expect("open");
        ctx.progress("b", 0.3).await.expect("open");

        assert_eq!(rx.recv().await.expect("event").progress, 0.8);
        assert_eq!(rx.recv().await.expect("event").progress, 0.3);
    }

    #[tokio::test]
    async fn closed_stream_reports_cancelled() {
        let (tx, rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);
        assert!(!ctx.is_cancelled());

        drop(rx);
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.progress("late", 0.5).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn data_payload_attached() {
        let (tx, mut rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);

        let mut data = Map::new();
        data.insert("step".into(), serde_json::json!(2));
        ctx.progress_with_data("step 2", 0.5, data)
            .await
            .expect("open stream");

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.data["step"], serde_json::json!(2));
    }
}
