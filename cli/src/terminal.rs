//! Countdown output for the `watch` command.

use std::io::{IsTerminal, Stdout, stdout};

use anyhow::Result;
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend};

use quizclock_engine::{ClockFace, RenderSink};
use quizclock_tui::{LineClock, Palette, TerminalClock, clear_inline_viewport};

const INLINE_VIEWPORT_HEIGHT: u16 = 1;

/// RAII wrapper around a one-row inline viewport.
///
/// On drop the viewport is cleared and the cursor restored, so whatever the
/// CLI prints next starts on a clean line.
pub struct InlineClock {
    clock: TerminalClock<CrosstermBackend<Stdout>>,
}

impl InlineClock {
    pub fn new(palette: Palette, label: String) -> Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(INLINE_VIEWPORT_HEIGHT),
            },
        )?;
        Ok(Self {
            clock: TerminalClock::new(terminal, palette).with_label(label),
        })
    }
}

impl RenderSink for InlineClock {
    fn render(&mut self, face: &ClockFace) {
        self.clock.render(face);
    }
}

impl Drop for InlineClock {
    fn drop(&mut self) {
        let _ = clear_inline_viewport(self.clock.terminal_mut());
    }
}

/// Pick the sink for stdout: an inline viewport on a terminal, plain lines
/// otherwise.
pub fn clock_sink(palette: Palette, label: String) -> Result<Box<dyn RenderSink + Send>> {
    if stdout().is_terminal() {
        Ok(Box::new(InlineClock::new(palette, label)?))
    } else {
        Ok(Box::new(LineClock::new(stdout()).with_label(label)))
    }
}
