// chat-ui - terminal chat message viewer
//
// Renders a conversation as composable messages (avatar, content, actions),
// keeps earlier messages cached while the last one streams, copies message
// text to the clipboard with timed feedback and opens attachment previews
// in a side drawer.
//
// Architecture:
// - chat: message model, scoped providers, the composable message and the list
// - widget: attachment cards, preview drawers, file icons, content sources
// - tui (ratatui): terminal setup, event loop, drawer, clipboard, toast
// - config / logging / cli: ambient plumbing shared with the binary

pub mod chat;
pub mod cli;
pub mod config;
pub mod demo;
pub mod logging;
pub mod theme;
pub mod tui;
pub mod widget;
