// Line-based scroll state shared by the message list and the preview drawer
//
// The offset is stored as an anchor: either the tail of the content (the
// message list starts there so streamed tokens stay in view) or a fixed
// first line. Moving down onto the last page re-anchors to the tail.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Last page, tracking growth
    Tail,
    /// Fixed first visible line
    Line(usize),
}

/// Scroll state for a single panel
#[derive(Debug, Clone)]
pub struct ScrollState {
    anchor: Anchor,
    total: usize,
    viewport: usize,
}

impl ScrollState {
    /// Scroll state that follows the end of the content
    pub fn new() -> Self {
        Self {
            anchor: Anchor::Tail,
            total: 0,
            viewport: 0,
        }
    }

    /// Scroll state that starts at the first line and stays put
    pub fn manual() -> Self {
        Self {
            anchor: Anchor::Line(0),
            ..Self::new()
        }
    }

    /// Record the sizes of the current frame
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        if let Anchor::Line(line) = self.anchor {
            self.anchor = Anchor::Line(line.min(self.max_offset()));
        }
    }

    pub fn is_following(&self) -> bool {
        self.anchor == Anchor::Tail
    }

    /// Move by `delta` lines, clamped to the content
    fn scroll_by(&mut self, delta: isize) {
        let target = self.offset().saturating_add_signed(delta).min(self.max_offset());
        self.anchor = if delta > 0 && target == self.max_offset() {
            Anchor::Tail
        } else {
            Anchor::Line(target)
        };
    }

    fn page(&self) -> isize {
        isize::try_from(self.viewport.max(1)).unwrap_or(isize::MAX)
    }

    pub fn scroll_up(&mut self) {
        self.scroll_by(-1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_by(1);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-self.page());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.page());
    }

    pub fn scroll_to_top(&mut self) {
        self.anchor = Anchor::Line(0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.anchor = Anchor::Tail;
    }

    /// Move the minimum distance so lines `start..end` are on screen
    ///
    /// When the range is taller than the viewport its first line wins.
    pub fn ensure_visible(&mut self, start: usize, end: usize) {
        let current = self.offset();
        let target = if start < current || end.saturating_sub(start) > self.viewport {
            start
        } else if end > current + self.viewport {
            end - self.viewport
        } else {
            current
        };
        let target = target.min(self.max_offset());
        self.anchor = if self.total > 0 && target == self.max_offset() {
            Anchor::Tail
        } else {
            Anchor::Line(target)
        };
    }

    /// First visible line
    pub fn offset(&self) -> usize {
        match self.anchor {
            Anchor::Tail => self.max_offset(),
            Anchor::Line(line) => line.min(self.max_offset()),
        }
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_tracks_streamed_lines() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 5);

        scroll.update_dimensions(15, 5);
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn reading_history_stops_following() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(20, 5);

        scroll.scroll_up();
        assert!(!scroll.is_following());
        assert_eq!(scroll.offset(), 14);

        scroll.update_dimensions(25, 5);
        assert_eq!(scroll.offset(), 14);

        scroll.page_down();
        scroll.page_down();
        assert!(scroll.is_following());
        assert_eq!(scroll.offset(), 20);
    }

    #[test]
    fn manual_starts_at_top_and_clamps() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 0);
        scroll.page_down();
        assert_eq!(scroll.offset(), 5);
        scroll.page_down();
        assert_eq!(scroll.offset(), 5);
        scroll.page_up();
        scroll.page_up();
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(3, 10);
        scroll.scroll_down();
        assert_eq!(scroll.offset(), 0);
        assert!(!scroll.needs_scrollbar());
    }

    #[test]
    fn ensure_visible_moves_minimally() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(100, 10);

        scroll.ensure_visible(40, 44);
        assert_eq!(scroll.offset(), 34);

        scroll.ensure_visible(20, 22);
        assert_eq!(scroll.offset(), 20);

        // Taller than the viewport: show its top
        scroll.ensure_visible(50, 70);
        assert_eq!(scroll.offset(), 50);
        assert!(!scroll.is_following());

        scroll.ensure_visible(95, 100);
        assert!(scroll.is_following());
    }
}
