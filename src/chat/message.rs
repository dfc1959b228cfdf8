//! Message and attachment data model
//!
//! Messages are immutable once handed to the renderer. A streamed update
//! produces a fresh `Arc<Message>`; the renderer relies on that pointer
//! changing to notice new content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat speaker role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    /// Any role the upstream handler invents (tool, data, ...)
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of an attached document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentFileType {
    Csv,
    Pdf,
    Docx,
    Txt,
    Other(String),
}

impl DocumentFileType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for DocumentFileType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for DocumentFileType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DocumentFileType> for String {
    fn from(file_type: DocumentFileType) -> Self {
        file_type.as_str().to_string()
    }
}

/// A document referenced by a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub id: String,
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub file_type: DocumentFileType,
    /// Retrieval chunk IDs the document was split into
    #[serde(default)]
    pub refs: Option<Vec<String>>,
    /// Where the raw content can be resolved from
    #[serde(default)]
    pub url: Option<String>,
}

impl DocumentFile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: impl Into<DocumentFileType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
            file_type: file_type.into(),
            refs: None,
            url: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refs = Some(refs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// True when the file was resolved into retrieval chunks
    pub fn has_refs(&self) -> bool {
        self.refs.as_ref().is_some_and(|refs| !refs.is_empty())
    }

    /// Chunk IDs joined for display, `None` without refs
    pub fn refs_label(&self) -> Option<String> {
        self.refs
            .as_ref()
            .filter(|refs| !refs.is_empty())
            .map(|refs| refs.join(", "))
    }

    /// Non-empty content locator, if any
    pub fn source_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<DocumentFile>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_attachments(mut self, attachments: Vec<DocumentFile>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Copy of this message with `delta` appended to the content
    pub fn appended(&self, delta: &str) -> Self {
        let mut next = self.clone();
        next.content.push_str(delta);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_unknown_names() {
        assert_eq!(Role::from("assistant".to_string()), Role::Assistant);
        assert_eq!(
            Role::from("tool".to_string()),
            Role::Other("tool".to_string())
        );
        assert_eq!(Role::Other("tool".to_string()).as_str(), "tool");
    }

    #[test]
    fn file_type_parse_is_case_insensitive() {
        assert_eq!(DocumentFileType::from("PDF"), DocumentFileType::Pdf);
        assert_eq!(
            DocumentFileType::from("xlsx"),
            DocumentFileType::Other("xlsx".to_string())
        );
    }

    #[test]
    fn empty_refs_do_not_count() {
        let file = DocumentFile::new("a", "a.txt", "txt").with_refs(Vec::<String>::new());
        assert!(!file.has_refs());
        assert_eq!(file.refs_label(), None);

        let file = file.with_refs(["chunk-1", "chunk-2"]);
        assert!(file.has_refs());
        assert_eq!(file.refs_label().as_deref(), Some("chunk-1, chunk-2"));
    }

    #[test]
    fn deserializes_transcript_entry() {
        let json = r#"{
            "role": "assistant",
            "content": "See attached",
            "attachments": [
                {"id": "d1", "name": "report.pdf", "size": 1536, "type": "pdf", "url": "file:///tmp/report.pdf"}
            ]
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].file_type, DocumentFileType::Pdf);
        assert_eq!(message.attachments[0].size, Some(1536));
        assert!(message.attachments[0].refs.is_none());
    }

    #[test]
    fn appended_leaves_original_untouched() {
        let original = Message::assistant("Hel");
        let next = original.appended("lo");
        assert_eq!(original.content, "Hel");
        assert_eq!(next.content, "Hello");
    }
}
