//! Chat rendering core
//!
//! - `message`: data model
//! - `scope`: thread-local provider/accessor plumbing
//! - `context` / `handler`: the message and chat scopes built on it
//! - `chat_message`: the composable message and its memoized wrapper
//! - `chat_messages`: the list that stacks them

pub mod chat_message;
pub mod chat_messages;
pub mod context;
pub mod handler;
pub mod message;
pub mod scope;
pub mod transcript;

pub use chat_message::{
    should_skip_render, Actions, Avatar, ChatMessage, Column, Content, MemoChatMessage,
    MessagePart, MessageView, PartsFactory,
};
pub use chat_messages::{ChatMessages, CopyJob, CopyOutcome};
pub use context::{provide_chat_message, use_chat_message, MessageContext};
pub use handler::{provide_chat, use_chat, ChatEvent, ChatHandler, ChatSession};
pub use message::{DocumentFile, DocumentFileType, Message, Role};
pub use scope::ScopeError;
pub use transcript::{load_transcript, parse_transcript};
