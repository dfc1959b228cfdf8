//! Scrollable message list
//!
//! One `MemoChatMessage` per position. Every draw reads the handler from the
//! chat scope, hands fresh props to each entry and stacks the cached views.
//! The selected message is the terminal's stand-in for the hovered one: it
//! gets the gutter marker and reveals its action controls.

use super::chat_message::{MemoChatMessage, PartsFactory};
use super::handler::use_chat;
use super::message::{DocumentFile, Message};
use crate::theme::Theme;
use crate::tui::clipboard::{ClipboardWriteError, ClipboardWriter, CopyToClipboard, PendingCopy};
use crate::tui::components::scrollbar::render_scrollbar;
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Component, ComponentId, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

const SELECTED_GUTTER: &str = "▎ ";
const GUTTER: &str = "  ";

struct Entry {
    /// Stable for the entry's lifetime; never reused
    id: u64,
    memo: MemoChatMessage,
    copy: CopyToClipboard,
}

/// A clipboard write started from the list
pub struct CopyJob {
    entry: u64,
    pending: PendingCopy,
}

impl CopyJob {
    /// Run the write to completion
    pub async fn run(self) -> CopyOutcome {
        CopyOutcome {
            entry: self.entry,
            generation: self.pending.generation,
            result: self.pending.write.await,
        }
    }
}

/// Result of a finished [`CopyJob`]
#[derive(Debug)]
pub struct CopyOutcome {
    entry: u64,
    generation: u64,
    pub result: Result<(), ClipboardWriteError>,
}

/// Message list with selection, scrolling and per-message copy state
pub struct ChatMessages {
    entries: Vec<Entry>,
    selected: Option<usize>,
    scroll: ScrollState,
    /// Bring the selection into view on the next draw
    reveal_selection: bool,
    /// Row span of each entry in the last draw
    rows: Vec<(usize, usize)>,
    writer: Arc<dyn ClipboardWriter>,
    copy_timeout: Duration,
    parts: Option<PartsFactory>,
    next_id: u64,
}

impl ChatMessages {
    pub fn new(writer: Arc<dyn ClipboardWriter>, copy_timeout: Duration) -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
            scroll: ScrollState::new(),
            reveal_selection: false,
            rows: Vec::new(),
            writer,
            copy_timeout,
            parts: None,
            next_id: 0,
        }
    }

    /// Render every message with custom parts instead of the defaults
    pub fn with_parts(mut self, parts: PartsFactory) -> Self {
        self.parts = Some(parts);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Reconcile entries with the handler's messages
    ///
    /// Entries are keyed by position; only the last message is "last".
    pub fn sync(&mut self, messages: &[Arc<Message>]) {
        let count = messages.len();
        self.entries.truncate(count);
        for (i, message) in messages.iter().enumerate() {
            let is_last = i + 1 == count;
            match self.entries.get_mut(i) {
                Some(entry) => {
                    entry.memo.update(Arc::clone(message), is_last);
                }
                None => {
                    let mut memo = MemoChatMessage::new(Arc::clone(message), is_last);
                    if let Some(parts) = &self.parts {
                        memo = memo.with_parts(Rc::clone(parts));
                    }
                    self.next_id += 1;
                    self.entries.push(Entry {
                        id: self.next_id,
                        memo,
                        copy: CopyToClipboard::new(Arc::clone(&self.writer), self.copy_timeout),
                    });
                }
            }
        }
        if let Some(selected) = self.selected {
            self.selected = count.checked_sub(1).map(|last| selected.min(last));
        }
    }

    pub fn select_previous(&mut self) {
        let last = match self.entries.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        };
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => last,
        });
        self.reveal_selection = true;
    }

    pub fn select_next(&mut self) {
        let last = match self.entries.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        };
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(last),
            None => last,
        });
        self.reveal_selection = true;
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Start copying the selected message's content
    ///
    /// None when nothing is selected or the message is empty. The copied
    /// flag of that entry is cleared until the job's outcome is finished.
    pub fn start_copy(&mut self) -> Option<CopyJob> {
        let entry = self.entries.get_mut(self.selected?)?;
        let text = entry.memo.copy_content().to_string();
        let pending = entry.copy.start(&text)?;
        Some(CopyJob {
            entry: entry.id,
            pending,
        })
    }

    /// Apply a finished copy to the entry that started it
    ///
    /// None when that entry is gone or a newer copy superseded the job.
    pub fn finish_copy(&mut self, outcome: CopyOutcome) -> Option<Result<(), ClipboardWriteError>> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == outcome.entry) else {
            tracing::debug!("Dropping clipboard result for a removed message");
            return None;
        };
        entry.copy.finish(outcome.generation, outcome.result)
    }

    /// The `n`th (0-based) attachment of the selected message
    pub fn selected_attachment(&self, n: usize) -> Option<DocumentFile> {
        let entry = self.entries.get(self.selected?)?;
        entry.memo.message().attachments.get(n).cloned()
    }

    #[cfg(test)]
    pub(crate) fn is_copied(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.copy.is_copied())
    }

    #[cfg(test)]
    fn render_counts(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.memo.render_count()).collect()
    }

    fn draw_lines(&mut self, width: u16, theme: &Theme, loading: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        self.rows.clear();

        for (i, entry) in self.entries.iter_mut().enumerate() {
            let selected = self.selected == Some(i);
            let (gutter, gutter_style) = if selected {
                (SELECTED_GUTTER, Style::default().fg(theme.highlight))
            } else {
                (GUTTER, Style::default())
            };
            let ctx = RenderContext::new(theme)
                .with_width(width)
                .with_copied(entry.copy.is_copied());

            let start = lines.len();
            match entry.memo.view(&ctx) {
                Ok(view) => {
                    for line in view.lines(selected) {
                        let mut spans = vec![Span::styled(gutter, gutter_style)];
                        spans.extend(line.spans);
                        lines.push(Line::from(spans));
                    }
                }
                Err(e) => {
                    tracing::debug!(index = i, "Message render failed: {}", e);
                    lines.push(Line::from(vec![
                        Span::styled(gutter, gutter_style),
                        Span::styled(
                            format!("⚠ {}", e),
                            Style::default().fg(theme.error),
                        ),
                    ]));
                }
            }
            self.rows.push((start, lines.len()));
            lines.push(Line::default());
        }

        if loading {
            lines.push(Line::from(Span::styled(
                format!("{}…", GUTTER),
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::SLOW_BLINK),
            )));
        }
        lines
    }
}

impl Component for ChatMessages {
    fn id(&self) -> ComponentId {
        ComponentId::Messages
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chat = match use_chat() {
            Ok(chat) => chat,
            Err(e) => {
                f.render_widget(
                    Paragraph::new(e.to_string()).style(Style::default().fg(theme.error)),
                    area,
                );
                return;
            }
        };
        self.sync(&chat.messages());

        if self.entries.is_empty() && !chat.is_loading() {
            f.render_widget(
                Paragraph::new("No messages yet").style(Style::default().fg(theme.muted)),
                area,
            );
            return;
        }

        let [content, bar] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let width = content.width.saturating_sub(GUTTER.len() as u16);
        let lines = self.draw_lines(width, theme, chat.is_loading());

        self.scroll
            .update_dimensions(lines.len(), usize::from(content.height));
        if self.reveal_selection {
            if let Some((start, end)) = self.selected.and_then(|i| self.rows.get(i).copied()) {
                self.scroll.ensure_visible(start, end);
            }
            self.reveal_selection = false;
        }

        let offset = u16::try_from(self.scroll.offset()).unwrap_or(u16::MAX);
        f.render_widget(Paragraph::new(lines).scroll((offset, 0)), content);
        render_scrollbar(f, bar, &self.scroll, theme);
    }
}

impl Interactive for ChatMessages {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.scroll.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.scroll.scroll_to_bottom(),
            KeyCode::Esc => return self.clear_selection().into(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  y:copy  1-9/Enter:open attachment  q:quit")
    }
}
