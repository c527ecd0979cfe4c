//! Local countdown state.
//!
//! Pure state: no timers and no I/O. [`TimerSession`](crate::TimerSession)
//! calls [`LocalCountdown::tick`] once per tick period and turns the returned
//! [`Tick`] into a render or the expiry action.

/// Result of one decrement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time is left; render this value.
    Remaining(u32),
    /// This tick reached zero. Returned exactly once per countdown.
    Expired,
    /// The countdown already expired; nothing to do.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCountdown {
    remaining: u32,
    expired: bool,
}

impl LocalCountdown {
    #[must_use]
    pub fn start(initial_seconds: u32) -> Self {
        Self {
            remaining: initial_seconds,
            expired: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Decrement by one second.
    ///
    /// A decrement that lands on zero (or would go below it) yields
    /// [`Tick::Expired`] instead of a value; the final `0` is never rendered.
    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Idle;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.expired = true;
            return Tick::Expired;
        }
        self.remaining -= 1;
        Tick::Remaining(self.remaining)
    }

    /// Overwrite the remaining time with an authoritative value.
    ///
    /// Never expires the countdown, even for `0`: expiry only comes from
    /// [`LocalCountdown::tick`]. Ignored once expired; returns whether the
    /// value was applied.
    pub fn set_remaining(&mut self, seconds: u32) -> bool {
        if self.expired {
            return false;
        }
        self.remaining = seconds;
        true
    }
}
