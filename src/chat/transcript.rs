//! JSON transcript loading
//!
//! Accepts either a bare array of messages or `{"messages": [...]}`.

use super::message::Message;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Messages(Vec<Message>),
    Wrapped { messages: Vec<Message> },
}

pub fn parse_transcript(json: &str) -> Result<Vec<Message>> {
    let file: TranscriptFile =
        serde_json::from_str(json).context("Transcript is not a list of chat messages")?;
    Ok(match file {
        TranscriptFile::Messages(messages) => messages,
        TranscriptFile::Wrapped { messages } => messages,
    })
}

pub fn load_transcript(path: &Path) -> Result<Vec<Message>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    let messages = parse_transcript(&json)
        .with_context(|| format!("Failed to load transcript {}", path.display()))?;
    tracing::info!(count = messages.len(), path = %path.display(), "Loaded transcript");
    Ok(messages)
}
