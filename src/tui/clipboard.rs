//! Clipboard access and the copy-feedback controller
//!
//! Uses `arboard` crate for cross-platform support (Windows, macOS, Linux).
//! The clipboard is created fresh each time to avoid holding resources.
//!
//! `CopyToClipboard` keeps the "copied" flag that the copy action shows as a
//! check mark. The flag falls back to false once the timeout elapses; every
//! new copy restarts that window. There is never more than one reset timer.

use anyhow::{Context, Result};
use arboard::Clipboard;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Copy text to the system clipboard
///
/// Common failure cases: no display server (headless Linux), permission denied.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// The platform refused the write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardWriteError {
    pub reason: String,
}

impl ClipboardWriteError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ClipboardWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Copy failed: {}", self.reason)
    }
}

impl std::error::Error for ClipboardWriteError {}

/// Asynchronous clipboard write capability
pub trait ClipboardWriter: Send + Sync {
    fn write(&self, text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>>;
}

/// System clipboard through arboard, off the async executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write(&self, text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>> {
        async move {
            tokio::task::spawn_blocking(move || copy_to_clipboard(&text))
                .await
                .map_err(|e| ClipboardWriteError::new(e.to_string()))?
                .map_err(|e| ClipboardWriteError::new(format!("{:#}", e)))
        }
        .boxed()
    }
}

/// Flag shared between the controller and its reset task
#[derive(Debug, Default)]
struct CopyFlag {
    copied: AtomicBool,
    /// Bumped on every copy and cancel; a reset only applies to its own generation
    generation: AtomicU64,
}

/// Copy action state: writes text and exposes a timed "copied" flag
pub struct CopyToClipboard {
    writer: Arc<dyn ClipboardWriter>,
    timeout: Duration,
    flag: Arc<CopyFlag>,
    reset_task: Option<JoinHandle<()>>,
}

/// A clipboard write in flight
///
/// Hand `write` to a task and pass its result back to
/// [`CopyToClipboard::finish`] together with `generation`.
pub struct PendingCopy {
    pub generation: u64,
    pub write: BoxFuture<'static, Result<(), ClipboardWriteError>>,
}

impl CopyToClipboard {
    pub fn new(writer: Arc<dyn ClipboardWriter>, timeout: Duration) -> Self {
        Self {
            writer,
            timeout,
            flag: Arc::new(CopyFlag::default()),
            reset_task: None,
        }
    }

    pub fn is_copied(&self) -> bool {
        self.flag.copied.load(Ordering::SeqCst)
    }

    pub fn has_pending_reset(&self) -> bool {
        self.reset_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Begin copying `text`: cancel the pending reset, clear the flag and
    /// return the write to run
    ///
    /// Empty text returns None and leaves the state untouched.
    pub fn start(&mut self, text: &str) -> Option<PendingCopy> {
        if text.is_empty() {
            return None;
        }
        self.cancel_reset();
        self.flag.copied.store(false, Ordering::SeqCst);
        Some(PendingCopy {
            generation: self.flag.generation.load(Ordering::SeqCst),
            write: self.writer.write(text.to_string()),
        })
    }

    /// Apply the outcome of the write started as `generation`
    ///
    /// Returns None for a stale outcome: a newer copy started since, or the
    /// controller was reset. Stale outcomes never touch the flag. Must be
    /// called inside a tokio runtime.
    pub fn finish(
        &mut self,
        generation: u64,
        result: Result<(), ClipboardWriteError>,
    ) -> Option<Result<(), ClipboardWriteError>> {
        if self.flag.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Ignoring stale clipboard result");
            return None;
        }
        if let Err(e) = &result {
            tracing::warn!("Clipboard write failed: {}", e.reason);
            return Some(result);
        }

        self.flag.copied.store(true, Ordering::SeqCst);
        let flag = Arc::clone(&self.flag);
        let timeout = self.timeout;
        self.reset_task = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if flag.generation.load(Ordering::SeqCst) == generation {
                flag.copied.store(false, Ordering::SeqCst);
            }
        }));
        tracing::debug!("Copied to clipboard");
        Some(result)
    }

    /// Write `text` and raise the copied flag for `timeout`
    ///
    /// Runs [`start`](Self::start) and [`finish`](Self::finish) back to back;
    /// callers that must stay responsive drive the two halves themselves.
    pub async fn copy(&mut self, text: &str) -> Result<(), ClipboardWriteError> {
        let Some(pending) = self.start(text) else {
            return Ok(());
        };
        let result = pending.write.await;
        self.finish(pending.generation, result).unwrap_or(Ok(()))
    }

    fn cancel_reset(&mut self) {
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
        self.flag.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for CopyToClipboard {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}

impl fmt::Debug for CopyToClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyToClipboard")
            .field("timeout", &self.timeout)
            .field("is_copied", &self.is_copied())
            .field("pending_reset", &self.has_pending_reset())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::sleep;

    #[derive(Default)]
    struct FakeWriter {
        writes: Mutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl FakeWriter {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl ClipboardWriter for FakeWriter {
        fn write(&self, text: String) -> BoxFuture<'static, Result<(), ClipboardWriteError>> {
            let result = if self.fail.load(Ordering::SeqCst) {
                Err(ClipboardWriteError::new("no display"))
            } else {
                self.writes.lock().unwrap().push(text);
                Ok(())
            };
            futures::future::ready(result).boxed()
        }
    }

    fn controller() -> (Arc<FakeWriter>, CopyToClipboard) {
        let writer = Arc::new(FakeWriter::default());
        let copy = CopyToClipboard::new(writer.clone(), Duration::from_millis(2000));
        (writer, copy)
    }

    #[tokio::test(start_paused = true)]
    async fn flag_set_immediately_and_reset_after_timeout() {
        let (writer, mut copy) = controller();
        assert!(!copy.is_copied());

        copy.copy("hello").await.unwrap();
        assert!(copy.is_copied());
        assert_eq!(writer.writes(), vec!["hello".to_string()]);

        sleep(Duration::from_millis(1999)).await;
        assert!(copy.is_copied());

        sleep(Duration::from_millis(2)).await;
        assert!(!copy.is_copied());
        assert!(!copy.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn second_copy_restarts_the_window() {
        let (writer, mut copy) = controller();

        copy.copy("first").await.unwrap();
        sleep(Duration::from_millis(500)).await;
        copy.copy("second").await.unwrap();

        // The first timer would have fired at 2000
        sleep(Duration::from_millis(1600)).await;
        assert!(copy.is_copied());

        sleep(Duration::from_millis(401)).await;
        assert!(!copy.is_copied());
        assert_eq!(writer.writes().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_leaves_flag_false() {
        let (writer, mut copy) = controller();
        copy.copy("ok").await.unwrap();
        assert!(copy.is_copied());

        writer.fail.store(true, Ordering::SeqCst);
        let err = copy.copy("again").await.unwrap_err();
        assert_eq!(err.reason, "no display");
        assert!(!copy.is_copied());
        assert!(!copy.has_pending_reset());

        sleep(Duration::from_millis(2500)).await;
        assert!(!copy.is_copied());
        assert_eq!(writer.writes(), vec!["ok".to_string()]);
    }

    #[tokio::test]
    async fn empty_text_is_a_no_op() {
        let (writer, mut copy) = controller();
        copy.copy("").await.unwrap();
        assert!(!copy.is_copied());
        assert!(writer.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_write_result_is_ignored() {
        let (writer, mut copy) = controller();
        let first = copy.start("first").unwrap();
        let second = copy.start("second").unwrap();
        assert_ne!(first.generation, second.generation);

        // The first write lands after the second copy started
        let late = first.write.await;
        assert!(copy.finish(first.generation, late).is_none());
        assert!(!copy.is_copied());

        let result = second.write.await;
        assert_eq!(copy.finish(second.generation, result), Some(Ok(())));
        assert!(copy.is_copied());
        assert_eq!(writer.writes(), vec!["first".to_string(), "second".to_string()]);

        sleep(Duration::from_millis(2001)).await;
        assert!(!copy.is_copied());
    }

    #[tokio::test]
    async fn start_clears_flag_before_the_write_completes() {
        let (_writer, mut copy) = controller();
        copy.copy("one").await.unwrap();
        assert!(copy.is_copied());

        let pending = copy.start("two").unwrap();
        assert!(!copy.is_copied());
        assert!(!copy.has_pending_reset());
        drop(pending);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_reset() {
        let (_writer, mut copy) = controller();
        copy.copy("x").await.unwrap();
        let flag = Arc::clone(&copy.flag);
        drop(copy);

        sleep(Duration::from_millis(2500)).await;
        // The aborted task never ran its reset
        assert!(flag.copied.load(Ordering::SeqCst));
    }
}
