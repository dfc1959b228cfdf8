//! Component trait system for the chat TUI
//!
//! The App owns components and routes input to them; each component knows
//! how to draw itself and which keys it consumes.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                     App                      │
//! │   (routes events, owns the open preview)     │
//! └──────────────────────────────────────────────┘
//!             │                     │
//!             ▼                     ▼
//!      ┌──────────────┐      ┌──────────────┐
//!      │ ChatMessages │      │   Preview    │
//!      └──────────────┘      └──────────────┘
//! ```
//!
//! - [`Component`] - render + identity
//! - [`Interactive`] - keyboard handling
//! - [`RenderContext`] - what message parts may read while rendering

mod component;
mod interactive;

pub use component::{Component, ComponentId, RenderContext};
pub use interactive::{Handled, Interactive};
