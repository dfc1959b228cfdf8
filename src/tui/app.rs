// App state
//
// Owns the chat session, the message list, the open attachment preview and
// the transient toast. Key routing is layered: an open preview swallows
// everything, then app-level keys (quit, copy, open attachment), then the
// message list.
//
// Clipboard writes run on their own task. Their outcomes come back through
// the copy channel, which the event loop drains next to key input.

use crate::chat::{provide_chat, ChatEvent, ChatHandler, ChatMessages, ChatSession, CopyOutcome};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::theme::Theme;
use crate::tui::components::{status_bar, StatusInfo, Toast};
use crate::tui::traits::{Component, ComponentId, Interactive};
use crate::widget::{ContentSource, Preview};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};
use std::rc::Rc;
use std::time::Instant;
use tokio::sync::mpsc;

const PREVIEW_HINT: &str = "↑↓:scroll  PgUp/PgDn:page  Esc:close";

pub struct App {
    session: Rc<ChatSession>,
    pub messages: ChatMessages,
    /// Attachment drawer; dropped once closed
    preview: Option<Preview>,
    content_source: Box<dyn ContentSource>,
    pub theme: Theme,
    pub config: Config,
    log_buffer: LogBuffer,
    toast: Option<Toast>,
    copy_tx: mpsc::UnboundedSender<CopyOutcome>,
    /// Taken once by the event loop
    copy_rx: Option<mpsc::UnboundedReceiver<CopyOutcome>>,
    pub should_quit: bool,
    started_at: Instant,
}

impl App {
    pub fn new(
        session: Rc<ChatSession>,
        messages: ChatMessages,
        content_source: Box<dyn ContentSource>,
        config: Config,
        log_buffer: LogBuffer,
    ) -> Self {
        let theme = Theme::by_name(&config.theme);
        let (copy_tx, copy_rx) = mpsc::unbounded_channel();
        Self {
            session,
            messages,
            preview: None,
            content_source,
            theme,
            config,
            log_buffer,
            toast: None,
            copy_tx,
            copy_rx: Some(copy_rx),
            should_quit: false,
            started_at: Instant::now(),
        }
    }

    /// Receiver of finished clipboard writes; None after the first call
    pub fn take_copy_results(&mut self) -> Option<mpsc::UnboundedReceiver<CopyOutcome>> {
        self.copy_rx.take()
    }

    /// Feed a chat event into the session; the next draw picks it up
    pub fn apply(&mut self, event: ChatEvent) {
        self.session.apply(event);
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    pub fn focused(&self) -> ComponentId {
        if self.preview.is_some() {
            ComponentId::Preview
        } else {
            self.messages.id()
        }
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview.as_ref().is_some_and(Preview::is_open)
    }

    /// Open the `n`th attachment of the selected message
    pub fn open_attachment(&mut self, n: usize) {
        if self.messages.selected().is_none() {
            self.show_toast(Toast::new("Select a message first (↑/↓)"));
            return;
        }
        let Some(file) = self.messages.selected_attachment(n) else {
            return;
        };
        let Some(mut preview) = Preview::for_file(&file) else {
            self.show_toast(Toast::new(format!("{} has no preview", file.name)));
            return;
        };
        if preview.open(self.content_source.as_ref()) {
            tracing::debug!(document = %file.id, "Opened attachment preview");
            self.preview = Some(preview);
        }
    }

    /// Handle one key event
    ///
    /// Never waits on the clipboard; copies finish through `finish_copy`.
    /// Must be called inside a tokio runtime.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Layer 1: an open preview captures all input
        if let Some(preview) = &mut self.preview {
            preview.handle_key(key);
            if !preview.is_open() {
                self.preview = None;
            }
            return;
        }

        // Layer 2: app keys
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('y') => {
                self.start_copy();
                return;
            }
            KeyCode::Enter => {
                self.open_attachment(0);
                return;
            }
            KeyCode::Char(c @ '1'..='9') => {
                let n = c as usize - '1' as usize;
                self.open_attachment(n);
                return;
            }
            _ => {}
        }

        // Layer 3: message list
        if !self.messages.handle_key(key).was_handled() {
            tracing::trace!(code = ?key.code, "Unhandled key");
        }
    }

    fn start_copy(&mut self) {
        if self.messages.selected().is_none() {
            self.show_toast(Toast::new("Select a message to copy (↑/↓)"));
            return;
        }
        let Some(job) = self.messages.start_copy() else {
            return;
        };
        let tx = self.copy_tx.clone();
        tokio::spawn(async move {
            // The receiver is gone only when the app is shutting down
            let _ = tx.send(job.run().await);
        });
    }

    /// Apply a finished clipboard write; stale results are dropped silently
    pub fn finish_copy(&mut self, outcome: CopyOutcome) {
        match self.messages.finish_copy(outcome) {
            None => {}
            Some(Ok(())) => self.show_toast(Toast::new("✓ Copied to clipboard")),
            Some(Err(e)) => self.show_toast(Toast::error(e.to_string())),
        }
    }

    /// Periodic housekeeping between draws
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Uptime formatted as HH:MM:SS
    pub fn uptime(&self) -> String {
        let secs = self.started_at.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    fn status_info(&self) -> StatusInfo {
        let hint = match self.focused() {
            ComponentId::Preview => Some(PREVIEW_HINT),
            ComponentId::Messages => self.messages.focus_hint(),
        };
        StatusInfo {
            uptime: self.uptime(),
            message_count: self.session.len(),
            streaming: self.session.is_loading(),
            problem: self.log_buffer.latest_problem().map(|e| e.message),
            hint,
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let status = self.status_info();
        let [main, bar] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());

        let handler: Rc<dyn ChatHandler> = self.session.clone();
        let messages = &mut self.messages;
        let theme = &self.theme;
        provide_chat(handler, || messages.render(f, main, theme));

        if let Some(preview) = &mut self.preview {
            preview.render(f, main, &self.theme, self.config.drawer_width_percent);
        }
        status_bar::render(f, bar, &self.theme, &status);
        if let Some(toast) = &self.toast {
            toast.render(f, main, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{DocumentFile, Message};
    use crate::tui::clipboard::{ClipboardWriteError, ClipboardWriter};
    use crate::widget::{DocumentContent, UnresolvedAttachmentError};
    use futures::future::{BoxFuture, FutureExt};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    struct OkWriter;

    impl ClipboardWriter for OkWriter {
        fn write(&self, _text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>> {
            async { Ok(()) }.boxed()
        }
    }

    struct FailingWriter;

    impl ClipboardWriter for FailingWriter {
        fn write(&self, _text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>> {
            async { Err(ClipboardWriteError::new("no display")) }.boxed()
        }
    }

    /// A write that never completes
    struct StuckWriter;

    impl ClipboardWriter for StuckWriter {
        fn write(&self, _text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>> {
            futures::future::pending().boxed()
        }
    }

    struct TextSource;

    impl ContentSource for TextSource {
        fn resolve(
            &self,
            _document_id: &str,
            _url: &str,
        ) -> Result<DocumentContent, UnresolvedAttachmentError> {
            Ok(DocumentContent::from_bytes(b"raw text".to_vec()))
        }
    }

    fn test_app() -> App {
        app_with_writer(Arc::new(OkWriter))
    }

    fn app_with_writer(writer: Arc<dyn ClipboardWriter>) -> App {
        let session = Rc::new(ChatSession::from_messages(vec![
            Message::user("hello").with_attachments(vec![
                DocumentFile::new("n", "notes.txt", "txt").with_url("notes.txt"),
                DocumentFile::new("x", "empty.txt", "txt"),
            ]),
        ]));
        let messages = ChatMessages::new(writer, Duration::from_millis(2000));
        App::new(
            session,
            messages,
            Box::new(TextSource),
            Config::default(),
            LogBuffer::new(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn quit_keys() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = test_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn preview_swallows_keys_until_closed() {
        let mut app = test_app();
        draw(&mut app);
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Enter));
        assert!(app.is_preview_open());
        assert_eq!(app.focused(), ComponentId::Preview);
        assert!(draw(&mut app).contains("raw text"));

        app.handle_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(!app.is_preview_open());
        assert_eq!(app.focused(), ComponentId::Messages);
    }

    #[test]
    fn attachment_without_preview_toasts() {
        let mut app = test_app();
        draw(&mut app);
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Char('2')));
        assert!(!app.is_preview_open());
        assert!(draw(&mut app).contains("empty.txt has no preview"));
    }

    #[test]
    fn copy_without_selection_toasts() {
        let mut app = test_app();
        draw(&mut app);
        app.handle_key(press(KeyCode::Char('y')));
        assert!(draw(&mut app).contains("Select a message to copy"));
    }

    #[tokio::test]
    async fn copy_reports_success_when_the_write_lands() {
        let mut app = test_app();
        let mut results = app.take_copy_results().unwrap();
        assert!(app.take_copy_results().is_none());
        draw(&mut app);
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Char('y')));
        assert!(!draw(&mut app).contains("Copied to clipboard"));

        let outcome = results.recv().await.unwrap();
        app.finish_copy(outcome);
        assert!(draw(&mut app).contains("Copied to clipboard"));
        assert!(app.messages.is_copied(0));
    }

    #[tokio::test]
    async fn copy_failure_shows_error_toast() {
        let mut app = app_with_writer(Arc::new(FailingWriter));
        let mut results = app.take_copy_results().unwrap();
        draw(&mut app);
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Char('y')));

        let outcome = results.recv().await.unwrap();
        assert!(outcome.result.is_err());
        app.finish_copy(outcome);
        assert!(draw(&mut app).contains("Copy failed: no display"));
        assert!(!app.messages.is_copied(0));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_write_does_not_block_the_app() {
        let mut app = app_with_writer(Arc::new(StuckWriter));
        let mut results = app.take_copy_results().unwrap();
        draw(&mut app);
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Char('y')));

        // Keys, chat events and draws keep flowing while the write hangs
        app.handle_key(press(KeyCode::Enter));
        assert!(app.is_preview_open());
        app.handle_key(press(KeyCode::Esc));
        app.apply(ChatEvent::Append(Message::user("still here")));
        assert!(draw(&mut app).contains("still here"));
        assert!(!app.messages.is_copied(0));

        let waited = tokio::time::timeout(Duration::from_secs(5), results.recv()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn streamed_events_reach_the_list() {
        let mut app = test_app();
        app.apply(ChatEvent::StreamStart(crate::chat::Role::Assistant));
        app.apply(ChatEvent::Delta("partial answer".to_string()));
        let screen = draw(&mut app);
        assert!(screen.contains("partial answer"));
        assert!(screen.contains("streaming"));
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn uptime_format() {
        let app = test_app();
        assert_eq!(app.uptime(), "00:00:00");
    }
}
