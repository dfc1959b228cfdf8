// Demo mode: a scripted conversation to showcase the viewer
//
// Sends a few complete messages with attachments, then streams an assistant
// reply word by word. Each word becomes a ChatEvent::Delta, so the last
// message is replaced by a fresh Arc on every token while earlier messages
// keep their cached views.
//
// Attachments cover every preview path: chunk references, a text file that
// resolves from the demo directory and a PDF whose URL does not resolve.

use crate::chat::{ChatEvent, DocumentFile, Message, Role};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

/// Delay between streamed words
const WORD_DELAY: Duration = Duration::from_millis(60);

const NOTES: &str = "Q3 planning notes\n\n- Revenue up 12% quarter over quarter\n- Churn flat at 2.1%\n- Hiring: two backend engineers\n";

const REPLY: &str = "Here is the summary. **Revenue** grew 12% while churn stayed flat. \
The notes also list two open backend roles.\n\n\
- `sales.csv` was split into retrieval chunks, press `1` on that message to see their IDs\n\
- `notes.txt` opens the raw text\n\
- `board-deck.pdf` is not available locally, so its preview shows the error";

/// Write the demo attachment files and return their directory
pub fn prepare_demo_files() -> Result<PathBuf> {
    let dir = std::env::temp_dir().join("chat-ui-demo");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create demo directory {}", dir.display()))?;
    std::fs::write(dir.join("notes.txt"), NOTES).context("Failed to write demo notes")?;
    Ok(dir)
}

/// Complete messages shown before the streamed reply, with pauses in ms
pub fn demo_script(dir: &Path) -> Vec<(ChatEvent, u64)> {
    let notes_url = format!("file://{}", dir.join("notes.txt").display());
    vec![
        (
            ChatEvent::Append(Message::new(
                Role::System,
                "You are a helpful analyst. Answer from the attached documents.",
            )),
            300,
        ),
        (
            ChatEvent::Append(
                Message::user("Can you summarize these for the planning meeting?")
                    .with_attachments(vec![
                        DocumentFile::new("doc-sales", "sales.csv", "csv")
                            .with_size(48_128)
                            .with_refs(["sales-chunk-1", "sales-chunk-2", "sales-chunk-3"]),
                        DocumentFile::new("doc-notes", "notes.txt", "txt")
                            .with_size(NOTES.len() as u64)
                            .with_url(notes_url),
                        DocumentFile::new("doc-deck", "board-deck.pdf", "pdf")
                            .with_size(1_536_000)
                            .with_url("board-deck.pdf"),
                    ]),
            ),
            900,
        ),
    ]
}

/// Drive the demo conversation until shutdown
pub async fn run_demo(
    dir: PathBuf,
    tx: mpsc::Sender<ChatEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    // Let the TUI draw its first frame
    sleep(Duration::from_millis(500)).await;

    for (event, delay_ms) in demo_script(&dir) {
        if shutdown_rx.try_recv().is_ok() || tx.send(event).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    if stream_reply(&tx, &mut shutdown_rx).await.is_err() {
        return;
    }
    tracing::debug!("Demo conversation finished");

    // Stay alive so the TUI keeps its sender, but listen for shutdown
    let _ = shutdown_rx.await;
}

/// Stream `REPLY` word by word; Err when the receiver went away
async fn stream_reply(
    tx: &mpsc::Sender<ChatEvent>,
    shutdown_rx: &mut oneshot::Receiver<()>,
) -> Result<(), ()> {
    tx.send(ChatEvent::StreamStart(Role::Assistant))
        .await
        .map_err(|_| ())?;

    for (i, word) in REPLY.split(' ').enumerate() {
        if shutdown_rx.try_recv().is_ok() {
            return Err(());
        }
        let delta = if i == 0 {
            word.to_string()
        } else {
            format!(" {}", word)
        };
        tx.send(ChatEvent::Delta(delta)).await.map_err(|_| ())?;
        sleep(WORD_DELAY).await;
    }

    tx.send(ChatEvent::StreamEnd).await.map_err(|_| ())
}
