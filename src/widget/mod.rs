//! Attachment surfaces: inline cards, preview drawers, icons
//!
//! Every attachment owns its own preview. A failure to resolve one document
//! never affects another document or the message around it.

mod body;
pub mod content_source;
pub mod document_preview;
pub mod icons;
pub mod pdf_dialog;

pub use body::PreviewBody;
pub use content_source::{
    ContentSource, DocumentContent, FileContentSource, UnresolvedAttachmentError,
};
pub use document_preview::{in_kb, size_label, DocumentPreview, DocumentPreviewCard};
pub use icons::{file_icon, FALLBACK_FILE_ICON};
pub use pdf_dialog::PdfDialog;

use crate::chat::{DocumentFile, DocumentFileType};
use crate::theme::Theme;
use crate::tui::drawer::PreviewState;
use crate::tui::traits::Handled;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

/// The preview a given attachment opens
#[derive(Debug, Clone)]
pub enum Preview {
    Document(DocumentPreview),
    Pdf(PdfDialog),
}

impl Preview {
    /// Pick the surface for `file`, or None when it has nothing to expand
    ///
    /// PDFs with a URL and no refs get the PDF dialog; everything else with
    /// refs or a URL gets the raw content drawer.
    pub fn for_file(file: &DocumentFile) -> Option<Self> {
        match (&file.file_type, file.has_refs(), file.source_url()) {
            (DocumentFileType::Pdf, false, Some(url)) => {
                Some(Self::Pdf(PdfDialog::new(file.id.clone(), url)))
            }
            _ => {
                let preview = DocumentPreview::new(file.clone());
                preview.has_trigger().then_some(Self::Document(preview))
            }
        }
    }

    pub fn open(&mut self, source: &dyn ContentSource) -> bool {
        match self {
            Self::Document(p) => p.open(source),
            Self::Pdf(p) => p.open(source),
        }
    }

    pub fn close(&mut self) {
        match self {
            Self::Document(p) => p.close(),
            Self::Pdf(p) => p.close(),
        }
    }

    pub fn state(&self) -> PreviewState {
        match self {
            Self::Document(p) => p.state(),
            Self::Pdf(p) => p.state(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == PreviewState::Expanded
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match self {
            Self::Document(p) => p.handle_key(key),
            Self::Pdf(p) => p.handle_key(key),
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme, width_percent: u16) {
        match self {
            Self::Document(p) => p.render(f, area, theme, width_percent),
            Self::Pdf(p) => p.render(f, area, theme, width_percent),
        }
    }
}
