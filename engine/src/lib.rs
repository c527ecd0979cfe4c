//! Timer engine for quizclock: local countdown, server resync and the
//! session that owns both.
//!
//! This crate has no terminal dependencies. Display goes through
//! [`RenderSink`], the authoritative clock through [`TimeSource`] and the
//! action taken at zero through [`ExpiryAction`]. The HTTP clients from
//! `quizclock-providers` implement the latter two.

mod countdown;
mod expiry;
mod render;
mod resync;
mod session;
mod source;

pub use countdown::{LocalCountdown, Tick};
pub use expiry::{ExpiryAction, ExpiryError};
pub use render::RenderSink;
pub use resync::ServerResync;
pub use session::{SessionHandle, SessionOutcome, SessionSettings, TimerSession};
pub use source::{ResyncError, TimeSource};

pub use quizclock_providers;
pub use quizclock_types::{ClockFace, SubmissionId, TimerLevel};
pub use tokio_util::sync::CancellationToken;
