// chat-ui binary
//
// Without arguments a scripted demo conversation streams in. With
// --transcript the given JSON file is shown instead; relative attachment
// paths resolve against the transcript's folder.

use anyhow::Result;
use chat_ui::chat::{load_transcript, ChatMessages, ChatSession};
use chat_ui::cli::{self, Cli};
use chat_ui::config::Config;
use chat_ui::demo;
use chat_ui::logging::{self, LogBuffer};
use chat_ui::tui::{self, app::App, clipboard::SystemClipboard};
use chat_ui::widget::FileContentSource;
use clap::Parser;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[tokio::main]
async fn main() -> Result<()> {
    // Subcommands (config --show, --reset, --path) exit early
    let cli = Cli::parse();
    if cli::handle_cli(&cli)? {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!();
            eprintln!("╭─ Configuration error ─────────────────────────────");
            for cause in e.chain() {
                eprintln!("│ {}", cause);
            }
            if let Some(path) = Config::config_path() {
                eprintln!("│");
                eprintln!("│ Fix or reset {}", path.display());
                eprintln!("│   chat-ui config --reset");
            }
            eprintln!("╰───────────────────────────────────────────────────");
            std::process::exit(1);
        }
    };

    // Logs go to the in-memory buffer (shown in the status bar) and
    // optionally to rotating files. The guard flushes file logs on exit.
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, &log_buffer)?;

    tracing::info!(version = chat_ui::config::VERSION, "Starting chat-ui");

    let (chat_tx, chat_rx) = mpsc::channel(256);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let (session, content_source) = match &cli.transcript {
        Some(path) => {
            let messages = load_transcript(path)?;
            let source = match path.parent() {
                Some(dir) => FileContentSource::with_base_dir(dir),
                None => FileContentSource::new(),
            };
            // Nothing streams into a loaded transcript
            drop(chat_tx);
            (ChatSession::from_messages(messages), source)
        }
        None => {
            let dir = demo::prepare_demo_files()?;
            tokio::spawn(demo::run_demo(dir.clone(), chat_tx, shutdown_rx));
            (ChatSession::new(), FileContentSource::with_base_dir(dir))
        }
    };

    let messages = ChatMessages::new(Arc::new(SystemClipboard), config.copy_timeout());
    let app = App::new(
        Rc::new(session),
        messages,
        Box::new(content_source),
        config,
        log_buffer,
    );

    let result = tui::run_tui(app, chat_rx).await;

    // Demo task may already be gone
    let _ = shutdown_tx.send(());
    tracing::info!("Shutting down");

    result
}
