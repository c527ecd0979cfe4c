//! The timer session: local countdown and server resync on one task.
//!
//! Both schedules are polled from a single `select!` loop, so the remaining
//! time has exactly one owner and needs no lock. Stopping the session cancels
//! the shared token; the loop exits at its next poll and any resync response
//! still in flight is dropped unapplied.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use quizclock_types::{ClockFace, SubmissionId};

use crate::countdown::{LocalCountdown, Tick};
use crate::expiry::{ExpiryAction, ExpiryError};
use crate::render::RenderSink;
use crate::resync::{ServerResync, periodic};
use crate::source::TimeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub tick: Duration,
    pub resync_period: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            resync_period: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub enum SessionOutcome {
    /// The countdown reached zero and the expiry action ran to completion.
    Expired(Result<(), ExpiryError>),
    /// Stopped before expiry. The expiry action did not run.
    Stopped,
}

impl SessionOutcome {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}

pub struct TimerSession<S, E, R> {
    submission: SubmissionId,
    initial_seconds: u32,
    settings: SessionSettings,
    source: Arc<S>,
    expiry: E,
    sink: R,
}

impl<S, E, R> TimerSession<S, E, R>
where
    S: TimeSource,
    E: ExpiryAction,
    R: RenderSink,
{
    #[must_use]
    pub fn new(
        submission: SubmissionId,
        initial_seconds: u32,
        settings: SessionSettings,
        source: Arc<S>,
        expiry: E,
        sink: R,
    ) -> Self {
        Self {
            submission,
            initial_seconds,
            settings,
            source,
            expiry,
            sink,
        }
    }

    /// Drive the session until expiry or until `cancel` fires.
    ///
    /// The initial value is rendered immediately. The first decrement happens
    /// one tick later and the first resync one resync period later. Once the
    /// countdown expires the resync schedule is stopped and the expiry action
    /// runs to completion; cancelling at that point no longer interrupts it.
    pub async fn run(self, cancel: CancellationToken) -> SessionOutcome {
        let Self {
            submission,
            initial_seconds,
            settings,
            source,
            expiry,
            mut sink,
        } = self;

        tracing::info!(
            %submission,
            initial_seconds,
            tick_ms = settings.tick.as_millis(),
            resync_secs = settings.resync_period.as_secs(),
            "Timer session started"
        );

        let mut countdown = LocalCountdown::start(initial_seconds);
        sink.render(&ClockFace::new(initial_seconds));

        let mut ticks = periodic(settings.tick, MissedTickBehavior::Burst);
        let mut resync =
            ServerResync::start(source, submission, settings.resync_period, cancel.child_token());

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    resync.stop();
                    tracing::info!(
                        %submission,
                        remaining = countdown.remaining(),
                        "Timer session stopped"
                    );
                    return SessionOutcome::Stopped;
                }
                _ = ticks.tick() => match countdown.tick() {
                    Tick::Remaining(seconds) => sink.render(&ClockFace::new(seconds)),
                    Tick::Expired => break,
                    Tick::Idle => {}
                },
                Some(seconds) = resync.next_resynced() => {
                    let drift = i64::from(seconds) - i64::from(countdown.remaining());
                    if countdown.set_remaining(seconds) {
                        if drift != 0 {
                            tracing::debug!(%submission, seconds, drift, "Applied server time");
                        }
                        sink.render(&ClockFace::new(seconds));
                    }
                }
            }
        }

        resync.stop();
        tracing::info!(%submission, "Time expired");
        let result = expiry.fire(submission).await;
        if let Err(err) = &result {
            tracing::error!(%submission, "Expiry action failed: {err}");
        }
        SessionOutcome::Expired(result)
    }
}

impl<S, E, R> TimerSession<S, E, R>
where
    S: TimeSource,
    E: ExpiryAction + 'static,
    R: RenderSink + Send + 'static,
{
    /// Run the session on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> SessionHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        SessionHandle { cancel, task }
    }
}

/// Owns a spawned session. Dropping the handle stops the session.
#[derive(Debug)]
pub struct SessionHandle {
    cancel: CancellationToken,
    task: JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    /// Cancel both schedules. Idempotent; a no-op once the session has
    /// expired.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// A token that stops the session when cancelled, for wiring into signal
    /// handlers.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn join(mut self) -> Result<SessionOutcome, JoinError> {
        (&mut self.task).await
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
