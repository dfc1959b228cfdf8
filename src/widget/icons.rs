//! Visual markers for attachment types

use crate::chat::DocumentFileType;

pub const CSV_ICON: &str = "▦";
pub const PDF_ICON: &str = "▤";
pub const DOCX_ICON: &str = "▥";
pub const TXT_ICON: &str = "≡";
/// Marker for any type missing from the table
pub const FALLBACK_FILE_ICON: &str = "□";

/// Marker for a document type; never fails
pub fn file_icon(file_type: &DocumentFileType) -> &'static str {
    match file_type {
        DocumentFileType::Csv => CSV_ICON,
        DocumentFileType::Pdf => PDF_ICON,
        DocumentFileType::Docx => DOCX_ICON,
        DocumentFileType::Txt => TXT_ICON,
        DocumentFileType::Other(_) => FALLBACK_FILE_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_their_own_marker() {
        assert_eq!(file_icon(&DocumentFileType::from("pdf")), PDF_ICON);
        assert_eq!(file_icon(&DocumentFileType::Csv), CSV_ICON);
        assert_eq!(file_icon(&DocumentFileType::Docx), DOCX_ICON);
        assert_eq!(file_icon(&DocumentFileType::Txt), TXT_ICON);
    }

    #[test]
    fn unknown_type_gets_fallback() {
        assert_eq!(
            file_icon(&DocumentFileType::from("unknown-type")),
            FALLBACK_FILE_ICON
        );
        assert_eq!(file_icon(&DocumentFileType::from("")), FALLBACK_FILE_ICON);
    }
}
