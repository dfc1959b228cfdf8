// Drawer overlay for attachment previews
//
// A drawer slides in from the left over the message list. It is either
// Collapsed (initial) or Expanded; closing always returns to Collapsed and
// throws away the scroll position so the next open starts fresh.
//
// Input is mapped to DrawerAction and executed by the owning preview, the
// same way the rest of the TUI routes keys into overlays.

use super::scroll::ScrollState;
use crate::theme::Theme;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Visibility of a preview drawer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Collapsed,
    Expanded,
}

/// Actions produced by drawer key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerAction {
    /// Input ignored
    None,
    /// Close the drawer
    Close,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
}

impl DrawerAction {
    pub fn from_key(key: KeyCode) -> Self {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => Self::Close,
            KeyCode::Up | KeyCode::Char('k') => Self::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => Self::ScrollDown,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown | KeyCode::Char(' ') => Self::PageDown,
            KeyCode::Home => Self::ScrollTop,
            KeyCode::End => Self::ScrollBottom,
            _ => Self::None,
        }
    }
}

/// Open/closed state plus the preview-only scroll position
#[derive(Debug, Clone)]
pub struct Drawer {
    state: PreviewState,
    scroll: ScrollState,
}

impl Drawer {
    pub fn new() -> Self {
        Self {
            state: PreviewState::Collapsed,
            scroll: ScrollState::manual(),
        }
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PreviewState::Expanded
    }

    /// Collapsed -> Expanded. Returns false if already open.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = PreviewState::Expanded;
        self.scroll = ScrollState::manual();
        true
    }

    /// Unconditionally back to Collapsed, discarding the scroll position
    pub fn close(&mut self) {
        self.state = PreviewState::Collapsed;
        self.scroll = ScrollState::manual();
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Execute an action; returns the resulting state
    pub fn apply(&mut self, action: DrawerAction) -> PreviewState {
        match action {
            DrawerAction::None => {}
            DrawerAction::Close => self.close(),
            DrawerAction::ScrollUp => self.scroll.scroll_up(),
            DrawerAction::ScrollDown => self.scroll.scroll_down(),
            DrawerAction::PageUp => self.scroll.page_up(),
            DrawerAction::PageDown => self.scroll.page_down(),
            DrawerAction::ScrollTop => self.scroll.scroll_to_top(),
            DrawerAction::ScrollBottom => self.scroll.scroll_to_bottom(),
        }
        self.state
    }

    /// Draw the drawer over the left part of `area`
    ///
    /// Nothing is drawn while collapsed.
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        theme: &Theme,
        width_percent: u16,
        title: &str,
        description: Line<'static>,
        body: Vec<Line<'static>>,
    ) {
        if !self.is_open() {
            return;
        }

        let drawer_area = drawer_rect(area, width_percent);
        f.render_widget(Clear, drawer_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.highlight))
            .style(Style::default().bg(theme.background).fg(theme.foreground))
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(" Close: Esc ").right_aligned());
        let inner = block.inner(drawer_area);
        f.render_widget(block, drawer_area);

        let [header, content] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        f.render_widget(
            Paragraph::new(description).style(Style::default().fg(theme.muted)),
            header.inner(Margin::new(1, 0)),
        );

        let content = content.inner(Margin::new(1, 0));
        let paragraph = Paragraph::new(body).wrap(Wrap { trim: false });
        let total = paragraph.line_count(content.width);
        self.scroll
            .update_dimensions(total, usize::from(content.height));
        let offset = u16::try_from(self.scroll.offset()).unwrap_or(u16::MAX);
        f.render_widget(paragraph.scroll((offset, 0)), content);
    }
}

impl Default for Drawer {
    fn default() -> Self {
        Self::new()
    }
}

/// Left-anchored rect leaving one row of headroom
fn drawer_rect(area: Rect, width_percent: u16) -> Rect {
    let percent = width_percent.clamp(20, 100);
    let width = (u32::from(area.width) * u32::from(percent) / 100) as u16;
    let width = width.max(area.width.min(30));
    let top = area.y + u16::from(area.height > 6);
    Rect::new(area.x, top, width, area.bottom() - top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn open_close_cycle() {
        let mut drawer = Drawer::new();
        assert_eq!(drawer.state(), PreviewState::Collapsed);

        assert!(drawer.open());
        assert!(!drawer.open());
        assert_eq!(drawer.state(), PreviewState::Expanded);

        assert_eq!(drawer.apply(DrawerAction::Close), PreviewState::Collapsed);
        assert!(drawer.open());
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(DrawerAction::from_key(KeyCode::Esc), DrawerAction::Close);
        assert_eq!(DrawerAction::from_key(KeyCode::Char('j')), DrawerAction::ScrollDown);
        assert_eq!(DrawerAction::from_key(KeyCode::Char('x')), DrawerAction::None);
    }

    #[test]
    fn close_discards_scroll_position() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let body: Vec<Line<'static>> = (0..50).map(|i| Line::raw(format!("line {i}"))).collect();

        let mut drawer = Drawer::new();
        drawer.open();
        terminal
            .draw(|f| {
                drawer.render(f, f.area(), &theme, 100, "T", Line::raw("d"), body.clone())
            })
            .unwrap();
        drawer.apply(DrawerAction::PageDown);
        assert!(drawer.scroll_offset() > 0);

        drawer.close();
        drawer.open();
        assert_eq!(drawer.scroll_offset(), 0);
    }

    #[test]
    fn collapsed_drawer_draws_nothing() {
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let mut drawer = Drawer::new();

        terminal
            .draw(|f| drawer.render(f, f.area(), &theme, 60, "Title", Line::raw(""), vec![]))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn drawer_rect_is_left_anchored() {
        let rect = drawer_rect(Rect::new(0, 0, 100, 40), 60);
        assert_eq!(rect, Rect::new(0, 1, 60, 39));
    }
}
