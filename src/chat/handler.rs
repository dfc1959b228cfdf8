//! Chat handler capability and its ambient provider
//!
//! The handler owns the message stream; the rendering layer only reads it.
//! `ChatSession` is the in-process handler used by the TUI: it applies
//! `ChatEvent`s coming from a transcript or a streaming task.

use super::message::{Message, Role};
use super::scope::{self, ScopeError, ScopeStack};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

thread_local! {
    static CHAT_SCOPE: ScopeStack<Rc<dyn ChatHandler>> = ScopeStack::new();
}

/// Source of the messages shown by the message list
pub trait ChatHandler {
    /// Current messages, oldest first
    fn messages(&self) -> Vec<Arc<Message>>;

    /// Whether a reply is being generated
    fn is_loading(&self) -> bool {
        false
    }
}

/// Run `f` with `handler` visible to `use_chat`
pub fn provide_chat<R>(handler: Rc<dyn ChatHandler>, f: impl FnOnce() -> R) -> R {
    scope::provide(&CHAT_SCOPE, handler, f)
}

/// Read the innermost chat handler
pub fn use_chat() -> Result<Rc<dyn ChatHandler>, ScopeError> {
    scope::current(&CHAT_SCOPE).ok_or(ScopeError::new("use_chat", "ChatProvider"))
}

/// Updates applied to a `ChatSession`
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A complete message joins the conversation
    Append(Message),
    /// A reply starts streaming
    StreamStart(Role),
    /// Token(s) for the message being streamed
    Delta(String),
    /// Streaming finished
    StreamEnd,
}

/// In-memory chat handler
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: RefCell<Vec<Arc<Message>>>,
    loading: Cell<bool>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: RefCell::new(messages.into_iter().map(Arc::new).collect()),
            loading: Cell::new(false),
        }
    }

    /// Apply one event. Deltas replace the last message with a new `Arc`.
    pub fn apply(&self, event: ChatEvent) {
        let mut messages = self.messages.borrow_mut();
        match event {
            ChatEvent::Append(message) => messages.push(Arc::new(message)),
            ChatEvent::StreamStart(role) => {
                messages.push(Arc::new(Message::new(role, String::new())));
                self.loading.set(true);
            }
            ChatEvent::Delta(delta) => match messages.last_mut() {
                Some(last) => *last = Arc::new(last.appended(&delta)),
                None => {
                    tracing::warn!("Dropping stream delta with no message to extend");
                }
            },
            ChatEvent::StreamEnd => self.loading.set(false),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChatHandler for ChatSession {
    fn messages(&self) -> Vec<Arc<Message>> {
        self.messages.borrow().clone()
    }

    fn is_loading(&self) -> bool {
        self.loading.get()
    }
}
