//! Drawer for PDF attachments that carry a URL

use super::body::PreviewBody;
use super::content_source::ContentSource;
use crate::theme::Theme;
use crate::tui::drawer::{Drawer, DrawerAction, PreviewState};
use crate::tui::traits::Handled;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::Frame;

pub const PDF_DIALOG_TITLE: &str = "PDF Content";

#[derive(Debug, Clone)]
pub struct PdfDialog {
    document_id: String,
    url: String,
    drawer: Drawer,
    body: Option<PreviewBody>,
}

impl PdfDialog {
    pub fn new(document_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            url: url.into(),
            drawer: Drawer::new(),
            body: None,
        }
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

    pub fn open(&mut self, source: &dyn ContentSource) -> bool {
        if !self.drawer.open() {
            return false;
        }
        tracing::debug!(document_id = %self.document_id, url = %self.url, "PDF dialog opened");
        self.body = Some(PreviewBody::resolve(source, &self.document_id, &self.url));
        true
    }

    pub fn close(&mut self) {
        self.drawer.close();
        self.body = None;
    }

    pub fn description(&self) -> String {
        format!("File URL: {}", self.url)
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
        let description = Line::from(vec![
            Span::raw("File URL: "),
            Span::styled(self.url.clone(), Style::default().fg(theme.link)),
        ]);
        self.drawer.render(
            f,
            area,
            theme,
            width_percent,
            PDF_DIALOG_TITLE,
            description,
            body,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::content_source::{DocumentContent, UnresolvedAttachmentError};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSource {
        requests: RefCell<Vec<(String, String)>>,
    }

    impl ContentSource for RecordingSource {
        fn resolve(
            &self,
            document_id: &str,
            url: &str,
        ) -> Result<DocumentContent, UnresolvedAttachmentError> {
            self.requests
                .borrow_mut()
                .push((document_id.to_string(), url.to_string()));
            Ok(DocumentContent::Binary {
                len: 2048,
                is_pdf: true,
            })
        }
    }

    #[test]
    fn resolves_by_document_id_and_url() {
        let source = RecordingSource::default();
        let mut dialog = PdfDialog::new("p1", "file:///docs/report.pdf");

        assert!(dialog.open(&source));
        assert_eq!(
            source.requests.borrow().as_slice(),
            &[("p1".to_string(), "file:///docs/report.pdf".to_string())]
        );
        assert_eq!(dialog.description(), "File URL: file:///docs/report.pdf");
    }

    #[test]
    fn close_control_collapses_and_drops_body() {
        let source = RecordingSource::default();
        let mut dialog = PdfDialog::new("p1", "a.pdf");
        dialog.open(&source);

        dialog.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(dialog.state(), PreviewState::Collapsed);
        assert!(dialog.body().is_none());
    }

    #[test]
    fn renders_title_and_url() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let mut dialog = PdfDialog::new("p1", "a.pdf");
        dialog.open(&RecordingSource::default());

        terminal
            .draw(|f| dialog.render(f, f.area(), &theme, 100))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("PDF Content"));
        assert!(screen.contains("File URL: a.pdf"));
        assert!(screen.contains("PDF document, 2048 bytes."));
    }
}
