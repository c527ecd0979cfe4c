//! Client for the authoritative remaining-time endpoint.

use serde::Deserialize;

use quizclock_types::SubmissionId;

use crate::client::ApiClient;
use crate::error::TimeRemainingError;

/// `{ "timeRemaining": 1234, "formatted": "20:34" }`; only the integer is used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeRemainingBody {
    time_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct TimeRemainingClient {
    api: ApiClient,
}

impl TimeRemainingClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Ask the server how many whole seconds remain for `submission`.
    pub async fn fetch(&self, submission: SubmissionId) -> Result<u32, TimeRemainingError> {
        let id = submission.to_string();
        let url = self.api.endpoint(&["api", "time-remaining", &id]);

        let response = self
            .api
            .get(url)
            .send()
            .await
            .map_err(TimeRemainingError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimeRemainingError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(TimeRemainingError::Transport)?;
        let parsed: TimeRemainingBody = serde_json::from_slice(&body)
            .map_err(|e| TimeRemainingError::Payload(e.to_string()))?;

        Ok(parsed.time_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> TimeRemainingClient {
        let api = ApiClient::new(&server.uri(), Some("tok".into()), Duration::from_secs(2)).unwrap();
        TimeRemainingClient::new(api)
    }

    #[tokio::test]
    async fn parses_time_remaining_and_sends_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/time-remaining/17"))
            .and(header("cookie", "session=tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"timeRemaining": 754, "formatted": "12:34"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.fetch(SubmissionId::new(17)).await.unwrap(), 754);
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/time-remaining/3"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(serde_json::json!({"error": "Unauthorized"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.fetch(SubmissionId::new(3)).await.unwrap_err();
        assert!(matches!(err, TimeRemainingError::Status(s) if s == StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn malformed_bodies_are_payload_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/time-remaining/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/time-remaining/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"timeRemaining": -5})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/time-remaining/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"remaining": 5})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        for id in [1, 2, 4] {
            let err = client.fetch(SubmissionId::new(id)).await.unwrap_err();
            assert!(matches!(err, TimeRemainingError::Payload(_)), "id {id}: {err:?}");
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let api = ApiClient::new(&uri, None, Duration::from_secs(2)).unwrap();
        let client = TimeRemainingClient::new(api);
        let err = client.fetch(SubmissionId::new(1)).await.unwrap_err();
        assert!(matches!(err, TimeRemainingError::Transport(_)));
    }
}
