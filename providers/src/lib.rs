//! HTTP clients for the quiz server.
//!
//! # Architecture
//!
//! Every client wraps an [`ApiClient`], which owns the `reqwest` connection
//! pool, the server base URL and the login session cookie:
//!
//! - [`TimeRemainingClient`] - `GET /api/time-remaining/{submission}`, the
//!   authoritative clock used for resync
//! - [`QuizSubmitter`] - `POST /student/quizzes/{quiz}/submissions/{submission}/submit`,
//!   the one-shot auto-submission, sent through [`retry`]
//! - [`CodeRunner`] - `POST /api/run-code`, the live test area
//!
//! # Error Handling
//!
//! Each endpoint has its own error enum in [`error`]. Nothing here retries
//! except the submitter; periodic callers such as the resync loop decide for
//! themselves what a failure means.

pub mod error;
pub mod retry;

mod client;
mod code_runner;
mod submit;
mod time_remaining;

pub use client::{ApiClient, SESSION_COOKIE_NAME};
pub use code_runner::CodeRunner;
pub use error::{ClientError, RunError, SubmitError, TimeRemainingError};
pub use retry::RetryConfig;
pub use submit::{QuizSubmitter, SubmitReceipt};
pub use time_remaining::TimeRemainingClient;

pub use quizclock_types;
