//! Per-message context shared with the parts of a rendered message
//!
//! `ChatMessage::render` provides a `MessageContext` for the duration of the
//! render; avatar, content and action parts read it with `use_chat_message`
//! instead of receiving the message as an argument. That keeps every part
//! swappable on its own.

use super::message::Message;
use super::scope::{self, ScopeError, ScopeStack};
use std::sync::Arc;

thread_local! {
    static MESSAGE_SCOPE: ScopeStack<MessageContext> = ScopeStack::new();
}

/// The message being rendered and whether it is the newest one
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub message: Arc<Message>,
    pub is_last: bool,
}

impl MessageContext {
    pub fn new(message: Arc<Message>, is_last: bool) -> Self {
        Self { message, is_last }
    }
}

/// Run `f` with `context` visible to `use_chat_message`
pub fn provide_chat_message<R>(context: MessageContext, f: impl FnOnce() -> R) -> R {
    scope::provide(&MESSAGE_SCOPE, context, f)
}

/// Read the innermost message context
///
/// Fails with `ScopeError` outside of a `ChatMessage` render; callers must
/// not fall back to a default message.
pub fn use_chat_message() -> Result<MessageContext, ScopeError> {
    scope::current(&MESSAGE_SCOPE)
        .ok_or(ScopeError::new("use_chat_message", "ChatMessage provider"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(text: &str, is_last: bool) -> MessageContext {
        MessageContext::new(Arc::new(Message::user(text)), is_last)
    }

    #[test]
    fn read_outside_scope_is_scope_error() {
        let err = use_chat_message().unwrap_err();
        assert_eq!(err.accessor, "use_chat_message");
        assert!(err.to_string().contains("ChatMessage provider"));
    }

    #[test]
    fn read_inside_scope_sees_provided_message() {
        let provided = context("hello", true);
        let message = Arc::clone(&provided.message);

        provide_chat_message(provided, || {
            let ctx = use_chat_message().unwrap();
            assert!(Arc::ptr_eq(&ctx.message, &message));
            assert!(ctx.is_last);
        });
    }

    #[test]
    fn siblings_do_not_leak() {
        provide_chat_message(context("first", false), || {
            assert_eq!(use_chat_message().unwrap().message.content, "first");
        });
        assert!(use_chat_message().is_err());
        provide_chat_message(context("second", true), || {
            let ctx = use_chat_message().unwrap();
            assert_eq!(ctx.message.content, "second");
            assert!(ctx.is_last);
        });
    }

    #[test]
    fn nested_message_shadows_outer() {
        provide_chat_message(context("outer", false), || {
            provide_chat_message(context("inner", true), || {
                assert_eq!(use_chat_message().unwrap().message.content, "inner");
            });
            assert_eq!(use_chat_message().unwrap().message.content, "outer");
        });
    }
}
