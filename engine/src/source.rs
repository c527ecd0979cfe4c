use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use quizclock_providers::{TimeRemainingClient, TimeRemainingError};
use quizclock_types::SubmissionId;

/// Why one resync attempt produced no value. Never fatal to the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResyncError {
    /// Network failure or a non-success status.
    #[error("transport: {0}")]
    Transport(String),
    /// The response body was not `{ "timeRemaining": <seconds> }`.
    #[error("payload: {0}")]
    Payload(String),
    #[error("cancelled")]
    Cancelled,
}

impl From<TimeRemainingError> for ResyncError {
    fn from(err: TimeRemainingError) -> Self {
        match err {
            TimeRemainingError::Payload(detail) => Self::Payload(detail),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Authoritative source of the remaining time for a submission.
pub trait TimeSource: Send + Sync + 'static {
    /// Fetch the remaining seconds. Implementations should return
    /// [`ResyncError::Cancelled`] promptly once `cancel` fires.
    fn time_remaining(
        &self,
        submission: SubmissionId,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<u32, ResyncError>> + Send;
}

impl TimeSource for TimeRemainingClient {
    fn time_remaining(
        &self,
        submission: SubmissionId,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<u32, ResyncError>> + Send {
        async move {
            tokio::select! {
                () = cancel.cancelled() => Err(ResyncError::Cancelled),
                result = self.fetch(submission) => result.map_err(ResyncError::from),
            }
        }
    }
}
