//! Periodic reconciliation against the authoritative time source.
//!
//! Requests are issued on a fixed schedule whether or not earlier ones have
//! completed. In-flight requests are polled together, so completions can
//! arrive out of issuance order; whichever completes last is applied last.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use quizclock_types::SubmissionId;

use crate::source::{ResyncError, TimeSource};

type PendingResync = BoxFuture<'static, Result<u32, ResyncError>>;

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// An interval whose first tick lands one `period` from now.
///
/// `period` is clamped to [1ms, 365 days] so the deadline arithmetic inside
/// the interval cannot overflow `Instant`.
pub(crate) fn periodic(period: Duration, behavior: MissedTickBehavior) -> Interval {
    let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(behavior);
    interval
}

pub struct ServerResync<S> {
    source: Arc<S>,
    submission: SubmissionId,
    schedule: Interval,
    cancel: CancellationToken,
    in_flight: FuturesUnordered<PendingResync>,
    issued: u64,
}

impl<S: TimeSource> ServerResync<S> {
    /// Begin the schedule. The first request goes out one `period` from now.
    ///
    /// Must be called inside a tokio runtime. Each request receives a child
    /// of `cancel`.
    pub fn start(
        source: Arc<S>,
        submission: SubmissionId,
        period: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            submission,
            schedule: periodic(period, MissedTickBehavior::Skip),
            cancel,
            in_flight: FuturesUnordered::new(),
            issued: 0,
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn issue(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        let source = Arc::clone(&self.source);
        let token = self.cancel.child_token();
        let submission = self.submission;
        self.in_flight
            .push(Box::pin(async move { source.time_remaining(submission, token).await }));
        self.issued += 1;
        tracing::trace!(
            %submission,
            seq = self.issued,
            in_flight = self.in_flight.len(),
            "Resync request issued"
        );
    }

    /// Wait for the next successful resync value.
    ///
    /// Drives the schedule while waiting: ticks issue requests, failures are
    /// logged and skipped. Returns `None` once the resync has been cancelled.
    /// Cancel-safe; dropping the future loses neither a tick nor a completion.
    pub async fn next_resynced(&mut self) -> Option<u32> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            tokio::select! {
                biased;
                Some(result) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    match result {
                        Ok(_) if self.cancel.is_cancelled() => return None,
                        Ok(seconds) => {
                            tracing::debug!(submission = %self.submission, seconds, "Resynced with server");
                            return Some(seconds);
                        }
                        Err(ResyncError::Cancelled) => {}
                        Err(err) => {
                            tracing::warn!(submission = %self.submission, "Resync failed: {err}");
                        }
                    }
                }
                _ = self.schedule.tick() => self.issue(),
            }
        }
    }

    /// Cancel the schedule and every in-flight request. Late completions are
    /// discarded.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.in_flight.clear();
    }
}

impl<S> Drop for ServerResync<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
