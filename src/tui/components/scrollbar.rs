//! Scrollbar rendering helper for panels backed by `ScrollState`

use crate::theme::Theme;
use crate::tui::scroll::ScrollState;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Render a minimal vertical scrollbar on the right edge of `area`
///
/// Only renders if content exceeds viewport.
pub fn render_scrollbar(f: &mut Frame, area: Rect, scroll: &ScrollState, theme: &Theme) {
    if !scroll.needs_scrollbar() {
        return;
    }

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None)
        .thumb_style(Style::default().fg(theme.border))
        .track_style(Style::default().fg(theme.muted));

    // ScrollbarState wants: content_length (how much can scroll) and position
    let content_length = scroll.total().saturating_sub(scroll.viewport());
    let mut scrollbar_state = ScrollbarState::new(content_length).position(scroll.offset());

    f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
}
