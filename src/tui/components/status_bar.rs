// Status bar component
//
// One row at the bottom: uptime, message count, streaming state, the latest
// warning from the log buffer and key hints for whatever has focus.

use crate::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Below this width the key hints are dropped
const HINTS_MIN_WIDTH: u16 = 90;

/// Everything the status bar shows, gathered before drawing
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub uptime: String,
    pub message_count: usize,
    pub streaming: bool,
    /// Latest warning or error message
    pub problem: Option<String>,
    pub hint: Option<&'static str>,
}

pub fn render(f: &mut Frame, area: Rect, theme: &Theme, info: &StatusInfo) {
    let mut left = vec![
        Span::styled(" chat-ui", Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" │ {}", info.uptime), Style::default().fg(theme.muted)),
        Span::styled(
            format!(" │ 💬 {}", info.message_count),
            Style::default().fg(theme.foreground),
        ),
    ];
    if info.streaming {
        left.push(Span::styled(" │ ✎ streaming", Style::default().fg(theme.assistant)));
    }
    if let Some(problem) = &info.problem {
        left.push(Span::styled(
            format!(" │ ⚠ {}", problem),
            Style::default().fg(theme.error),
        ));
    }

    let hint = info
        .hint
        .filter(|_| area.width >= HINTS_MIN_WIDTH)
        .unwrap_or_default();
    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(hint.chars().count() as u16 + 1),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(left)).style(Style::default().bg(theme.selection)),
        left_area,
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(theme.muted))))
            .style(Style::default().bg(theme.selection))
            .right_aligned(),
        right_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(width: u16, info: &StatusInfo) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| render(f, f.area(), &theme, info))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_count_and_problem() {
        let info = StatusInfo {
            uptime: "00:00:05".to_string(),
            message_count: 3,
            problem: Some("Copy failed".to_string()),
            ..Default::default()
        };
        let line = draw(100, &info);
        assert!(line.contains("00:00:05"));
        assert!(line.contains("Copy failed"));
    }

    #[test]
    fn hints_dropped_when_narrow() {
        let info = StatusInfo {
            hint: Some("q:quit"),
            ..Default::default()
        };
        assert!(draw(100, &info).contains("q:quit"));
        assert!(!draw(60, &info).contains("q:quit"));
    }
}
