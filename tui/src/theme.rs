//! Color theme for the countdown.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use quizclock_types::TimerLevel;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_dark: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub neutral: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            neutral: colors::GREEN,
            warning: colors::YELLOW,
            danger: colors::RED,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            text_primary: Color::White,
            text_muted: Color::Gray,
            neutral: Color::White,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }

    #[must_use]
    pub fn level_color(&self, level: TimerLevel) -> Color {
        match level {
            TimerLevel::Neutral => self.neutral,
            TimerLevel::Warning => self.warning,
            TimerLevel::Danger => self.danger,
        }
    }
}

#[must_use]
pub fn palette(high_contrast: bool) -> Palette {
    if high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style, TimerLevel};

    #[must_use]
    pub fn label(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    /// Danger is reversed so it still reads without color.
    #[must_use]
    pub fn clock(palette: &Palette, level: TimerLevel) -> Style {
        let style = Style::default()
            .fg(palette.level_color(level))
            .add_modifier(Modifier::BOLD);
        match level {
            TimerLevel::Danger => style.add_modifier(Modifier::REVERSED),
            TimerLevel::Neutral | TimerLevel::Warning => style,
        }
    }
}
