//! Client for the live "run code" area.

use quizclock_types::{RunRequest, RunResponse};

use crate::client::ApiClient;
use crate::error::RunError;

#[derive(Debug, Clone)]
pub struct CodeRunner {
    api: ApiClient,
}

impl CodeRunner {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Execute `request` remotely.
    ///
    /// The server answers validation failures (400) with a JSON `error`
    /// body; those decode into an unsuccessful [`RunResponse`] rather than a
    /// [`RunError`], so the caller can show the server's message.
    pub async fn run(&self, request: &RunRequest) -> Result<RunResponse, RunError> {
        let url = self.api.endpoint(&["api", "run-code"]);
        tracing::debug!(language = request.language.as_str(), "Running code remotely");

        let response = self
            .api
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(RunError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(RunError::Transport)?;

        match serde_json::from_slice::<RunResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.error.is_some() => Ok(parsed),
            Ok(_) => Err(RunError::Status(status)),
            Err(_) if !status.is_success() => Err(RunError::Status(status)),
            Err(e) => Err(RunError::Payload(e.to_string())),
        }
    }

    /// Run and render the result the way the output panel shows it.
    pub async fn run_for_display(&self, request: &RunRequest) -> String {
        match self.run(request).await {
            Ok(response) => response.display_text(),
            Err(err) => {
                tracing::warn!("Run request failed: {err}");
                err.display_text()
            }
        }
    }
}
