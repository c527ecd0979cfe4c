use std::future::Future;

use thiserror::Error;

use quizclock_providers::{QuizSubmitter, SubmitError};
use quizclock_types::SubmissionId;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpiryError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("{0}")]
    Other(String),
}

/// The one-shot action taken when the countdown reaches zero.
pub trait ExpiryAction: Send + Sync {
    fn fire(&self, submission: SubmissionId) -> impl Future<Output = Result<(), ExpiryError>> + Send;
}

impl ExpiryAction for QuizSubmitter {
    fn fire(&self, submission: SubmissionId) -> impl Future<Output = Result<(), ExpiryError>> + Send {
        async move {
            let receipt = self.submit().await?;
            tracing::info!(
                %submission,
                status = %receipt.status,
                url = %receipt.final_url,
                "Quiz auto-submitted"
            );
            Ok(())
        }
    }
}

/// `None` stands for an absent submit target: expiry becomes a no-op.
impl<E: ExpiryAction> ExpiryAction for Option<E> {
    fn fire(&self, submission: SubmissionId) -> impl Future<Output = Result<(), ExpiryError>> + Send {
        async move {
            match self {
                Some(action) => action.fire(submission).await,
                None => {
                    tracing::debug!(%submission, "No submit target; skipping expiry action");
                    Ok(())
                }
            }
        }
    }
}
