//! Timer sessions driven by the real HTTP clients against a mock quiz server.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizclock_engine::{SessionOutcome, SessionSettings, TimerSession};
use quizclock_providers::{ApiClient, QuizSubmitter, TimeRemainingClient};
use quizclock_types::{QuizId, SubmissionId};

use crate::common::{Recorder, SESSION, mount_submit, mount_time_remaining, requests_to, submit_path};

const QUIZ: u64 = 3;
const SUBMISSION: u64 = 7;

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Some(SESSION.to_string()), Duration::from_secs(5)).unwrap()
}

fn submitter(server: &MockServer) -> QuizSubmitter {
    QuizSubmitter::new(api(server), QuizId::new(QUIZ), SubmissionId::new(SUBMISSION))
}

fn source(server: &MockServer) -> Arc<TimeRemainingClient> {
    Arc::new(TimeRemainingClient::new(api(server)))
}

#[tokio::test]
async fn expired_session_submits_exactly_once() {
    let server = MockServer::start().await;
    mount_submit(&server, QUIZ, SUBMISSION).await;

    let sink = Recorder::default();
    let settings = SessionSettings {
        tick: Duration::from_millis(20),
        resync_period: Duration::from_secs(3600),
    };
    let session = TimerSession::new(
        SubmissionId::new(SUBMISSION),
        3,
        settings,
        source(&server),
        submitter(&server),
        sink.clone(),
    );

    let outcome = session.spawn().join().await.unwrap();

    assert!(matches!(outcome, SessionOutcome::Expired(Ok(()))));
    assert_eq!(sink.seconds(), vec![3, 2, 1]);
    let submits = requests_to(&server, &submit_path(QUIZ, SUBMISSION)).await;
    assert_eq!(submits.len(), 1);
}

#[tokio::test]
async fn resync_applies_the_server_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/time-remaining/{SUBMISSION}")))
        .and(header("cookie", format!("session={SESSION}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "timeRemaining": 42 })))
        .mount(&server)
        .await;

    let sink = Recorder::default();
    let settings = SessionSettings {
        tick: Duration::from_secs(60),
        resync_period: Duration::from_millis(50),
    };
    let handle = TimerSession::new(
        SubmissionId::new(SUBMISSION),
        1000,
        settings,
        source(&server),
        submitter(&server),
        sink.clone(),
    )
    .spawn();

    assert!(sink.wait_for(42, Duration::from_secs(5)).await);
    handle.stop();
    let outcome = handle.join().await.unwrap();

    assert!(matches!(outcome, SessionOutcome::Stopped));
    assert_eq!(sink.seconds()[0], 1000);
    assert!(requests_to(&server, &submit_path(QUIZ, SUBMISSION)).await.is_empty());
}

#[tokio::test]
async fn server_errors_do_not_stop_the_schedule() {
    let server = MockServer::start().await;
    let time_path = format!("/api/time-remaining/{SUBMISSION}");
    Mock::given(method("GET"))
        .and(path(time_path.as_str()))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(time_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_time_remaining(&server, SUBMISSION, 77).await;

    let sink = Recorder::default();
    let settings = SessionSettings {
        tick: Duration::from_secs(60),
        resync_period: Duration::from_millis(40),
    };
    let handle = TimerSession::new(
        SubmissionId::new(SUBMISSION),
        500,
        settings,
        source(&server),
        None::<QuizSubmitter>,
        sink.clone(),
    )
    .spawn();

    assert!(sink.wait_for(77, Duration::from_secs(5)).await);
    handle.stop();
    handle.join().await.unwrap();

    // Failed attempts render nothing.
    let rendered = sink.seconds();
    assert_eq!(rendered[0], 500);
    assert!(rendered[1..].iter().all(|s| *s == 77));
    assert!(requests_to(&server, &time_path).await.len() >= 4);
}

#[tokio::test]
async fn stopping_discards_a_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/time-remaining/{SUBMISSION}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "timeRemaining": 5 }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let sink = Recorder::default();
    let settings = SessionSettings {
        tick: Duration::from_secs(60),
        resync_period: Duration::from_millis(50),
    };
    let handle = TimerSession::new(
        SubmissionId::new(SUBMISSION),
        900,
        settings,
        source(&server),
        None::<QuizSubmitter>,
        sink.clone(),
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(120)).await;
    handle.stop();
    let outcome = handle.join().await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Stopped));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(sink.seconds(), vec![900]);
}
