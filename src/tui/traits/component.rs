//! Core component trait and the render context handed to message parts

use crate::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Identifier for a focusable top-level component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    /// Message list
    Messages,
    /// Attachment drawer (document or PDF)
    Preview,
}

/// Immutable context passed to message parts during rendering
///
/// Parts see the theme, the width they are laid out in and the copy
/// feedback of their own entry. The message itself comes from the message
/// context, not from here.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Color theme for styling
    pub theme: &'a Theme,

    /// Columns available to the whole message
    pub width: u16,

    /// Copy feedback of the entry being rendered
    pub is_copied: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            width: 80,
            is_copied: false,
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn with_copied(mut self, is_copied: bool) -> Self {
        self.is_copied = is_copied;
        self
    }
}

/// Base trait for top-level UI components
///
/// Rendering takes `&mut self` because components keep render caches and
/// scroll state that the draw pass updates.
pub trait Component {
    fn id(&self) -> ComponentId;

    /// Render the component to the given area
    fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}
