//! Quiz auto-submission.

use reqwest::StatusCode;
use url::Url;

use quizclock_types::{QuizId, SubmissionId};

use crate::client::ApiClient;
use crate::error::SubmitError;
use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};

/// Posts the answer form of one quiz attempt.
///
/// The server marks the attempt completed and redirects to the results page;
/// redirects are followed, so a successful submit ends on that page.
#[derive(Debug, Clone)]
pub struct QuizSubmitter {
    api: ApiClient,
    quiz: QuizId,
    submission: SubmissionId,
    retry: RetryConfig,
}

/// Where the server sent us after accepting the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub status: StatusCode,
    pub final_url: Url,
}

impl QuizSubmitter {
    #[must_use]
    pub fn new(api: ApiClient, quiz: QuizId, submission: SubmissionId) -> Self {
        Self {
            api,
            quiz,
            submission,
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn submit_url(&self) -> Url {
        let quiz = self.quiz.to_string();
        let submission = self.submission.to_string();
        self.api
            .endpoint(&["student", "quizzes", &quiz, "submissions", &submission, "submit"])
    }

    pub async fn submit(&self) -> Result<SubmitReceipt, SubmitError> {
        let url = self.submit_url();
        tracing::info!(quiz = %self.quiz, submission = %self.submission, "Submitting quiz");

        match send_with_retry(|| self.api.post(url.clone()), &self.retry).await {
            RetryOutcome::Success(response) => Ok(SubmitReceipt {
                status: response.status(),
                final_url: response.url().clone(),
            }),
            RetryOutcome::HttpError(response) => Err(SubmitError::Status(response.status())),
            RetryOutcome::ConnectionError { attempts, source } => {
                Err(SubmitError::Connection { attempts, source })
            }
            RetryOutcome::NonRetryable(err) => Err(SubmitError::Request(err)),
        }
    }
}
