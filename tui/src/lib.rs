//! Terminal rendering for quizclock.
//!
//! [`TerminalClock`] is the [`RenderSink`](quizclock_engine::RenderSink) the
//! CLI hands to a timer session.

mod clock;
mod theme;

pub use clock::{DEFAULT_LABEL, LineClock, TerminalClock, clear_inline_viewport, clock_line};
pub use theme::{Palette, palette, styles};
