//! Document attachment card and its raw-content drawer
//!
//! The card is what a message shows inline. Opening it expands a drawer with
//! either the retrieval chunk IDs (for documents that were split into refs)
//! or the raw content fetched through a `ContentSource`. Documents with refs
//! are never fetched.

use super::body::PreviewBody;
use super::content_source::ContentSource;
use super::icons::file_icon;
use crate::chat::DocumentFile;
use crate::theme::Theme;
use crate::tui::drawer::{Drawer, DrawerAction, PreviewState};
use crate::tui::traits::Handled;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use std::fmt;

/// Bytes to kilobytes rounded to one decimal
///
/// Displayed with `{}` so whole numbers print without a fraction (1024 -> "1").
pub fn in_kb(size: u64) -> f64 {
    (size as f64 / 1024.0 * 10.0).round() / 10.0
}

/// "1.5 KB", or None when the size is unknown or zero
pub fn size_label(size: Option<u64>) -> Option<String> {
    size.filter(|s| *s > 0).map(|s| format!("{} KB", in_kb(s)))
}

fn name_with_size(file: &DocumentFile) -> String {
    match size_label(file.size) {
        Some(size) => format!("{} ({})", file.name, size),
        None => file.name.clone(),
    }
}

/// Compact inline card for one attachment
#[derive(Clone, Copy)]
pub struct DocumentPreviewCard<'a> {
    file: &'a DocumentFile,
    on_remove: Option<&'a dyn Fn(&DocumentFile)>,
}

impl fmt::Debug for DocumentPreviewCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPreviewCard")
            .field("file", &self.file.id)
            .field("removable", &self.is_removable())
            .finish()
    }
}

impl<'a> DocumentPreviewCard<'a> {
    pub fn new(file: &'a DocumentFile) -> Self {
        Self {
            file,
            on_remove: None,
        }
    }

    /// Show the `✕` control and call `on_remove` when it is activated
    pub fn on_remove(mut self, on_remove: &'a dyn Fn(&DocumentFile)) -> Self {
        self.on_remove = Some(on_remove);
        self
    }

    pub fn is_removable(&self) -> bool {
        self.on_remove.is_some()
    }

    /// Activate the remove control; false when the card has none
    pub fn remove(&self) -> bool {
        match self.on_remove {
            Some(on_remove) => {
                tracing::debug!(document_id = %self.file.id, "Attachment removed");
                on_remove(self.file);
                true
            }
            None => false,
        }
    }

    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let card = Style::default().fg(theme.foreground).bg(theme.card);
        let muted = Style::default().fg(theme.muted).bg(theme.card);

        let mut title = vec![
            Span::styled(format!("{} ", file_icon(&self.file.file_type)), card),
            Span::styled(
                name_with_size(self.file),
                card.add_modifier(Modifier::BOLD),
            ),
        ];
        if self.is_removable() {
            title.push(Span::styled(" ✕", Style::default().fg(theme.error).bg(theme.card)));
        }

        let mut lines = vec![
            Line::from(title),
            Line::from(Span::styled(
                format!("  {} File", self.file.file_type.as_str().to_uppercase()),
                muted,
            )),
        ];
        if let Some(refs) = self.file.refs_label() {
            lines.push(Line::from(Span::styled(
                format!("  Document IDs: {}", refs),
                muted.add_modifier(Modifier::ITALIC),
            )));
        }
        lines
    }
}

/// Card plus drawer for a non-PDF (or chunked) document
#[derive(Debug, Clone)]
pub struct DocumentPreview {
    file: DocumentFile,
    drawer: Drawer,
    body: Option<PreviewBody>,
}

impl DocumentPreview {
    pub fn new(file: DocumentFile) -> Self {
        Self {
            file,
            drawer: Drawer::new(),
            body: None,
        }
    }

    /// Whether the card can be expanded at all
    pub fn has_trigger(&self) -> bool {
        self.file.has_refs() || self.file.source_url().is_some()
    }

    pub fn state(&self) -> PreviewState {
        self.drawer.state()
    }

    pub fn is_open(&self) -> bool {
        self.drawer.is_open()
    }

    pub fn body(&self) -> Option<&PreviewBody> {
        self.body.as_ref()
    }

    /// Collapsed -> Expanded, resolving the body
    ///
    /// Returns false when there is nothing to show or the drawer is already
    /// open. The source is only consulted for documents without refs.
    pub fn open(&mut self, source: &dyn ContentSource) -> bool {
        if self.is_open() {
            return false;
        }

        let body = match (self.file.refs_label(), self.file.source_url()) {
            (Some(refs), _) => PreviewBody::References(refs),
            (None, Some(url)) => PreviewBody::resolve(source, &self.file.id, url),
            (None, None) => return false,
        };
        tracing::debug!(document_id = %self.file.id, refs = self.file.has_refs(), "Document preview opened");
        self.drawer.open();
        self.body = Some(body);
        true
    }

    /// Back to Collapsed; the resolved body is dropped
    pub fn close(&mut self) {
        self.drawer.close();
        self.body = None;
    }

    pub fn title(&self) -> String {
        format!("{} Raw Content", self.file.file_type.as_str().to_uppercase())
    }

    pub fn description(&self) -> String {
        name_with_size(&self.file)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if !self.is_open() {
            return Handled::No;
        }
        match DrawerAction::from_key(key.code) {
            DrawerAction::None => Handled::No,
            DrawerAction::Close => {
                self.close();
                Handled::Yes
            }
            action => {
                self.drawer.apply(action);
                Handled::Yes
            }
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme, width_percent: u16) {
        let body = self
            .body
            .as_ref()
            .map(|b| b.lines(theme))
            .unwrap_or_default();
        let title = self.title();
        let description = Line::raw(self.description());
        self.drawer
            .render(f, area, theme, width_percent, &title, description, body);
    }
}
