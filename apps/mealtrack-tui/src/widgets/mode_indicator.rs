//! Mode indicator widget for the status bar.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use mealtrack_core::UiMode;

/// Displays the current form mode, color coded:
/// - Default (adding): Blue
/// - Editing: Yellow
pub struct ModeIndicator {
    mode: UiMode,
}

impl ModeIndicator {
    /// Create a new mode indicator for the given mode.
    pub fn new(mode: UiMode) -> Self {
        Self { mode }
    }

    /// Get the display color for the current mode.
    pub fn mode_color(mode: UiMode) -> Color {
        match mode {
            UiMode::Default => Color::Blue,
            UiMode::Editing => Color::Yellow,
        }
    }

    fn style(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Self::mode_color(self.mode))
            .add_modifier(Modifier::BOLD)
    }

    fn text(&self) -> String {
        format!("[{}]", self.mode.short_code())
    }

    /// Render as a styled span (for embedding in other widgets).
    pub fn as_span(&self) -> Span<'static> {
        Span::styled(self.text(), self.style())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_colors() {
        assert_eq!(ModeIndicator::mode_color(UiMode::Default), Color::Blue);
        assert_eq!(ModeIndicator::mode_color(UiMode::Editing), Color::Yellow);
    }

    #[test]
    fn test_span_text() {
        assert_eq!(ModeIndicator::new(UiMode::Default).as_span().content, "[ADD]");
        assert_eq!(ModeIndicator::new(UiMode::Editing).as_span().content, "[EDIT]");
    }
}
