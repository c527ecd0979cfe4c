//! Core domain types for quizclock.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod clock;
mod ids;
mod language;
mod run;

pub use clock::{
    ClockFace, DANGER_THRESHOLD_SECS, TimerLevel, WARNING_THRESHOLD_SECS, format_clock,
};
pub use ids::{QuizId, SubmissionId};
pub use language::{Language, LanguageParseError};
pub use run::{RunRequest, RunResponse, RunStage, TestVerdict};
