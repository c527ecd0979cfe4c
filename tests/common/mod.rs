//! Shared test utilities and fixtures
//!
//! Mock quiz server helpers and fakes for the timer session.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use quizclock_engine::{ClockFace, RenderSink};

pub const SESSION: &str = "abc123";

/// Mount `GET /api/time-remaining/{submission}` answering `seconds`.
pub async fn mount_time_remaining(server: &MockServer, submission: u64, seconds: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/api/time-remaining/{submission}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "timeRemaining": seconds })),
        )
        .mount(server)
        .await;
}

/// Mount the submit endpoint, answering 200.
pub async fn mount_submit(server: &MockServer, quiz: u64, submission: u64) {
    Mock::given(method("POST"))
        .and(path(submit_path(quiz, submission)))
        .respond_with(ResponseTemplate::new(200).set_body_string("submitted"))
        .mount(server)
        .await;
}

pub fn submit_path(quiz: u64, submission: u64) -> String {
    format!("/student/quizzes/{quiz}/submissions/{submission}/submit")
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}

/// Render sink that keeps every rendered value.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<u32>>>);

impl Recorder {
    pub fn seconds(&self) -> Vec<u32> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, seconds: u32) -> bool {
        self.0.lock().unwrap().contains(&seconds)
    }

    /// Poll until `seconds` has been rendered or `within` elapses.
    pub async fn wait_for(&self, seconds: u32, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if self.contains(seconds) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.contains(seconds)
    }
}

impl RenderSink for Recorder {
    fn render(&mut self, face: &ClockFace) {
        self.0.lock().unwrap().push(face.seconds());
    }
}

/// An isolated home directory with a config file for the binary.
pub struct Sandbox {
    pub home: TempDir,
}

impl Sandbox {
    pub fn new(config: &str) -> Self {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), config).unwrap();
        Self { home }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let file = self.home.path().join(name);
        std::fs::write(&file, contents).unwrap();
        file
    }

    /// Run the `quizclock` binary against `server` with a piped stdout.
    pub async fn run(&self, server: &MockServer, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_quizclock"))
            .args(args)
            .current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env("QUIZCLOCK_CONFIG", self.home.path().join("config.toml"))
            .env("QUIZCLOCK_BASE_URL", server.uri())
            .env("QUIZCLOCK_SESSION", SESSION)
            .env_remove("RUST_LOG")
            .kill_on_drop(true)
            .output()
            .await
            .unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
