//! Countdown presentation: `MM:SS` text and the urgency level.

use std::fmt;

/// Remaining time at or below which the clock shows the danger state.
pub const DANGER_THRESHOLD_SECS: u32 = 60;
/// Remaining time at or below which the clock shows the warning state.
pub const WARNING_THRESHOLD_SECS: u32 = 300;

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours; they widen past two digits when needed
/// (`6000` renders as `100:00`).
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{minutes:02}:{secs:02}")
}

/// Visual urgency of the countdown. Exactly one level applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerLevel {
    #[default]
    Neutral,
    Warning,
    Danger,
}

impl TimerLevel {
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Warning, Self::Danger];

    /// Danger is checked before warning, so the ranges never overlap.
    #[must_use]
    pub const fn classify(seconds: u32) -> Self {
        if seconds <= DANGER_THRESHOLD_SECS {
            Self::Danger
        } else if seconds <= WARNING_THRESHOLD_SECS {
            Self::Warning
        } else {
            Self::Neutral
        }
    }

    /// Style class used by the quiz page for this level.
    #[must_use]
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Warning => Some("timer-warning"),
            Self::Danger => Some("timer-danger"),
        }
    }
}

/// Everything a render sink needs to draw the countdown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    seconds: u32,
    text: String,
    level: TimerLevel,
}

impl ClockFace {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds,
            text: format_clock(seconds),
            level: TimerLevel::classify(seconds),
        }
    }

    #[must_use]
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn level(&self) -> TimerLevel {
        self.level
    }
}

impl fmt::Display for ClockFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
