//! End-to-end runs of the `quizclock` binary with stdout piped.

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    SESSION, Sandbox, mount_submit, mount_time_remaining, requests_to, stderr, stdout, submit_path,
};

const FAST_TIMER: &str = "[timer]\ntick_ms = 20\nresync_secs = 3600\n";

#[tokio::test]
async fn time_prints_the_server_clock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/time-remaining/7"))
        .and(header("cookie", format!("session={SESSION}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "timeRemaining": 3725 })))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new("");

    let output = sandbox.run(&server, &["time", "--submission", "7"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "62:05");
}

#[tokio::test]
async fn time_reports_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/time-remaining/7"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new("");

    let output = sandbox.run(&server, &["time", "--submission", "7"]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("submission 7"), "stderr: {}", stderr(&output));
}

#[tokio::test]
async fn watch_counts_down_and_submits() {
    let server = MockServer::start().await;
    mount_submit(&server, 3, 7).await;
    let sandbox = Sandbox::new(FAST_TIMER);

    let output = sandbox
        .run(
            &server,
            &["watch", "--quiz", "3", "--submission", "7", "--remaining", "3"],
        )
        .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_owned).collect();
    assert_eq!(
        lines,
        vec![
            "Quiz 3 / submission 7 00:03",
            "Quiz 3 / submission 7 00:02",
            "Quiz 3 / submission 7 00:01",
            "Time expired. Quiz submitted.",
        ]
    );
    assert_eq!(requests_to(&server, &submit_path(3, 7)).await.len(), 1);
    assert!(sandbox.path().join(".quizclock/logs/quizclock.log").exists());
}

#[tokio::test]
async fn watch_fetches_the_initial_value() {
    let server = MockServer::start().await;
    mount_time_remaining(&server, 7, 2).await;
    let sandbox = Sandbox::new(FAST_TIMER);

    let output = sandbox
        .run(
            &server,
            &["watch", "--quiz", "3", "--submission", "7", "--no-submit"],
        )
        .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Quiz 3 / submission 7 00:02\n"), "stdout: {out}");
    assert!(out.ends_with("Time expired.\n"), "stdout: {out}");
    assert!(requests_to(&server, &submit_path(3, 7)).await.is_empty());
}

#[tokio::test]
async fn watch_reports_a_failed_submit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(submit_path(3, 7)))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new(FAST_TIMER);

    let output = sandbox
        .run(
            &server,
            &["watch", "--quiz", "3", "--submission", "7", "--remaining", "1"],
        )
        .await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("could not be submitted"), "stderr: {}", stderr(&output));
}

#[tokio::test]
async fn run_checks_expected_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run-code"))
        .and(body_partial_json(serde_json::json!({
            "language": "python",
            "stdin": "5\n",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "run": { "stdout": "25\n", "stderr": "" },
            "execution_time": 0.12,
        })))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new("");
    let source = sandbox.write("square.py", "print(int(input()) ** 2)\n");
    let input = sandbox.write("input.txt", "5\n");
    let expected = sandbox.write("expected.txt", "25");

    let args = [
        "run",
        source.to_str().unwrap(),
        "--stdin",
        input.to_str().unwrap(),
        "--expect",
        expected.to_str().unwrap(),
    ];
    let output = sandbox.run(&server, &args).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "25\nPASS\n");
}

#[tokio::test]
async fn run_shows_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run-code"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "success": false,
            "error": "Unsupported language",
        })))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new("");
    let source = sandbox.write("Main.java", "class Main {}\n");

    let output = sandbox.run(&server, &["run", source.to_str().unwrap()]).await;

    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), "Error: Unsupported language");
}

#[tokio::test]
async fn run_needs_a_known_language() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new("");
    let source = sandbox.write("script.rb", "puts 1\n");

    let output = sandbox.run(&server, &["run", source.to_str().unwrap()]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--language"), "stderr: {}", stderr(&output));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
