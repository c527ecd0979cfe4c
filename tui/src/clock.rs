//! One-line countdown display.

use std::io::Write;

use ratatui::prelude::{Backend, Terminal};
use ratatui::{
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use quizclock_engine::RenderSink;
use quizclock_types::ClockFace;

use crate::theme::{Palette, styles};

pub const DEFAULT_LABEL: &str = "Time left";

/// `"{label} MM:SS"`, with the clock styled by its urgency level.
#[must_use]
pub fn clock_line(face: &ClockFace, palette: &Palette, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label} "), styles::label(palette)),
        Span::styled(face.text().to_owned(), styles::clock(palette, face.level())),
    ])
}

/// Draws every rendered face into a terminal, usually a one-row inline
/// viewport.
pub struct TerminalClock<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
    label: String,
}

impl<B: Backend> TerminalClock<B> {
    pub fn new(terminal: Terminal<B>, palette: Palette) -> Self {
        Self {
            terminal,
            palette,
            label: DEFAULT_LABEL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn draw(&mut self, face: &ClockFace) -> Result<(), B::Error> {
        let line = clock_line(face, &self.palette, &self.label);
        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            frame.render_widget(Paragraph::new(line), area);
        })?;
        Ok(())
    }
}

impl<B: Backend> RenderSink for TerminalClock<B> {
    fn render(&mut self, face: &ClockFace) {
        if let Err(err) = self.draw(face) {
            tracing::warn!(seconds = face.seconds(), "Failed to draw countdown: {err}");
        }
    }
}

/// Writes each rendered face as its own line. Used when stdout is not a
/// terminal.
pub struct LineClock<W: Write> {
    out: W,
    label: String,
}

impl<W: Write> LineClock<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            label: DEFAULT_LABEL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for LineClock<W> {
    fn render(&mut self, face: &ClockFace) {
        let written = writeln!(self.out, "{} {face}", self.label).and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::warn!(seconds = face.seconds(), "Failed to write countdown: {err}");
        }
    }
}

/// Blank the inline viewport so the shell prompt does not land on a stale
/// clock.
pub fn clear_inline_viewport<B: Backend>(terminal: &mut Terminal<B>) -> Result<(), B::Error> {
    terminal.clear()?;
    terminal.show_cursor()
}
