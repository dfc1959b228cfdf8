//! Expanded body shared by the document preview and the PDF dialog

use super::content_source::{ContentSource, DocumentContent, UnresolvedAttachmentError};
use crate::theme::Theme;
use crate::tui::markdown::sanitize_for_tui;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// What an expanded preview shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Retrieval chunk IDs joined with ", "
    References(String),
    Content(DocumentContent),
    Unresolved(UnresolvedAttachmentError),
}

impl PreviewBody {
    /// Ask the source for `(document_id, url)`; failures become the body
    pub fn resolve(source: &dyn ContentSource, document_id: &str, url: &str) -> Self {
        match source.resolve(document_id, url) {
            Ok(content) => Self::Content(content),
            Err(e) => {
                tracing::warn!(document_id, url, "Attachment preview failed: {}", e.reason);
                Self::Unresolved(e)
            }
        }
    }

    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        match self {
            Self::References(refs) => vec![Line::raw(refs.clone())],
            Self::Content(DocumentContent::Text(text)) => {
                if text.trim().is_empty() {
                    return vec![Line::styled("(empty document)", Style::default().fg(theme.muted))];
                }
                sanitize_for_tui(text).lines().map(|l| Line::raw(l.to_string())).collect()
            }
            Self::Content(DocumentContent::Binary { len, is_pdf: true }) => vec![
                Line::raw(format!("PDF document, {} bytes.", len)),
                Line::styled(
                    "Pages cannot be drawn in the terminal; open the file URL in a PDF viewer.",
                    Style::default().fg(theme.muted),
                ),
            ],
            Self::Content(DocumentContent::Binary { len, .. }) => vec![Line::styled(
                format!("Binary content ({} bytes) cannot be displayed", len),
                Style::default().fg(theme.muted),
            )],
            Self::Unresolved(e) => vec![Line::from(vec![
                Span::styled(
                    "✗ ",
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                ),
                Span::styled(e.to_string(), Style::default().fg(theme.error)),
            ])],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl ContentSource for Failing {
        fn resolve(
            &self,
            document_id: &str,
            url: &str,
        ) -> Result<DocumentContent, UnresolvedAttachmentError> {
            Err(UnresolvedAttachmentError {
                document_id: document_id.to_string(),
                url: url.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    #[test]
    fn failures_stay_in_the_body() {
        let body = PreviewBody::resolve(&Failing, "d1", "file:///x.txt");
        assert!(body.is_error());

        let lines = body.lines(&Theme::default());
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Cannot resolve document d1"));
        assert!(text.contains("offline"));
    }

    #[test]
    fn text_is_split_into_lines() {
        let body = PreviewBody::Content(DocumentContent::Text("a,b\n1,2".to_string()));
        let lines = body.lines(&Theme::default());
        assert_eq!(lines.len(), 2);
        let second: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(second, "1,2");
    }
}
