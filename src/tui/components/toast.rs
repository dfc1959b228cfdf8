//! Toast notification component
//!
//! A non-blocking overlay that auto-dismisses after a configurable duration.
//! Renders in the bottom-right corner on top of all other content. Used for
//! copy results, which otherwise only show as the check mark on the message.

use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Tone of the toast border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A toast notification that auto-dismisses
pub struct Toast {
    /// Message to display
    pub message: String,
    pub kind: ToastKind,
    /// When the toast was created
    created_at: Instant,
    /// How long to show the toast
    duration: Duration,
}

impl Toast {
    /// Create a new toast with default 2-second duration
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            created_at: Instant::now(),
            duration: Duration::from_secs(2),
        }
    }

    /// Error toast; stays up a little longer
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            duration: Duration::from_secs(4),
            ..Self::new(message)
        }
    }

    /// Check if the toast has expired and should be removed
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Render the toast in the bottom-right corner
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        // 4 for padding and border
        let text_width = u16::try_from(self.message.width()).unwrap_or(u16::MAX);
        let width = text_width.saturating_add(4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width.saturating_add(2));
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height).intersection(area);

        let border = match self.kind {
            ToastKind::Info => theme.highlight,
            ToastKind::Error => theme.error,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn fresh_toast_is_not_expired() {
        assert!(!Toast::new("Copied").is_expired());
        assert_eq!(Toast::error("nope").kind, ToastKind::Error);
    }

    #[test]
    fn renders_bottom_right() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let toast = Toast::new("Copied");
        terminal
            .draw(|f| toast.render(f, f.area(), &theme))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40)
            .map(|x| buffer[(x, 6)].symbol().to_string())
            .collect();
        assert!(row.contains("Copied"));
    }

    #[test]
    fn oversized_message_is_clamped_to_the_area() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let toast = Toast::error("x".repeat(usize::from(u16::MAX) + 10));
        terminal
            .draw(|f| toast.render(f, f.area(), &theme))
            .unwrap();

        let buffer = terminal.backend().buffer();
        // Clamped to 36 columns starting at x = 2
        assert_eq!(buffer[(1, 6)].symbol(), " ");
        assert_ne!(buffer[(2, 6)].symbol(), " ");
        assert_ne!(buffer[(37, 6)].symbol(), " ");
        assert_eq!(buffer[(38, 6)].symbol(), " ");
    }
}
