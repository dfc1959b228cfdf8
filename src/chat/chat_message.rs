//! Composable chat message: container plus Avatar, Content and Actions parts
//!
//! `ChatMessage` provides the message context for the duration of one
//! render and lays its parts out as columns. The parts never receive the
//! message directly; they read it with `use_chat_message`, so any of them
//! can be replaced without touching the others.
//!
//! `MemoChatMessage` wraps a message with a cached view and only rebuilds it
//! when `should_skip_render` says the incoming props differ.

use super::context::{provide_chat_message, use_chat_message, MessageContext};
use super::message::{Message, Role};
use super::scope::ScopeError;
use crate::tui::markdown::render_markdown;
use crate::tui::traits::RenderContext;
use crate::widget::{DocumentPreviewCard, Preview};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::rc::Rc;
use std::sync::Arc;

pub const USER_AVATAR: &str = "👤";
pub const ASSISTANT_AVATAR: &str = "🤖";
pub const FALLBACK_AVATAR: &str = "💬";
pub const COPY_MARKER: &str = "⧉";
pub const COPIED_MARKER: &str = "✓";

/// Columns between two parts
const COLUMN_GAP: u16 = 1;

/// Horizontal space a part asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Fixed(u16),
    /// Shares whatever the fixed columns leave
    Fill,
}

/// One slot of a rendered message
pub trait MessagePart {
    fn column(&self) -> Column {
        Column::Fill
    }

    /// Drawn only while the message is selected
    fn reveal_on_hover(&self) -> bool {
        false
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        width: u16,
    ) -> Result<Vec<Line<'static>>, ScopeError>;
}

/// Role marker column
#[derive(Debug, Clone, Default)]
pub struct Avatar {
    children: Option<Vec<Line<'static>>>,
}

impl Avatar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the role marker
    pub fn with_children(children: Vec<Line<'static>>) -> Self {
        Self {
            children: Some(children),
        }
    }

    pub fn marker(role: &Role) -> &'static str {
        match role {
            Role::User => USER_AVATAR,
            Role::Assistant => ASSISTANT_AVATAR,
            _ => FALLBACK_AVATAR,
        }
    }
}

impl MessagePart for Avatar {
    fn column(&self) -> Column {
        Column::Fixed(3)
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        _width: u16,
    ) -> Result<Vec<Line<'static>>, ScopeError> {
        if let Some(children) = &self.children {
            return Ok(children.clone());
        }
        let message = use_chat_message()?.message;
        let color = match message.role {
            Role::User => ctx.theme.user,
            Role::Assistant => ctx.theme.assistant,
            _ => ctx.theme.other_role,
        };
        Ok(vec![Line::from(Span::styled(
            Self::marker(&message.role),
            Style::default().fg(color),
        ))])
    }
}

/// Markdown body followed by attachment cards
#[derive(Debug, Clone, Default)]
pub struct Content {
    children: Option<Vec<Line<'static>>>,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rendered body
    pub fn with_children(children: Vec<Line<'static>>) -> Self {
        Self {
            children: Some(children),
        }
    }
}

impl MessagePart for Content {
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        width: u16,
    ) -> Result<Vec<Line<'static>>, ScopeError> {
        if let Some(children) = &self.children {
            return Ok(children.clone());
        }
        let message = use_chat_message()?.message;
        let theme = ctx.theme;

        let mut lines = render_markdown(&message.content, usize::from(width.max(1)), theme);
        for (index, file) in message.attachments.iter().enumerate() {
            lines.push(Line::default());
            let mut card = DocumentPreviewCard::new(file).lines(theme);
            if let Some(first) = card.first_mut() {
                let key = if Preview::for_file(file).is_some() && index < 9 {
                    format!("[{}] ", index + 1)
                } else {
                    "    ".to_string()
                };
                first
                    .spans
                    .insert(0, Span::styled(key, Style::default().fg(theme.muted)));
            }
            lines.extend(card);
        }
        Ok(lines)
    }
}

/// Per-message controls, shown on hover
#[derive(Debug, Clone, Default)]
pub struct Actions {
    children: Option<Vec<Line<'static>>>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the copy control
    pub fn with_children(children: Vec<Line<'static>>) -> Self {
        Self {
            children: Some(children),
        }
    }
}

impl MessagePart for Actions {
    fn column(&self) -> Column {
        Column::Fixed(2)
    }

    fn reveal_on_hover(&self) -> bool {
        true
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        _width: u16,
    ) -> Result<Vec<Line<'static>>, ScopeError> {
        if let Some(children) = &self.children {
            return Ok(children.clone());
        }
        let message = use_chat_message()?.message;
        if message.content.is_empty() {
            return Ok(Vec::new());
        }
        let control = if ctx.is_copied {
            Span::styled(
                COPIED_MARKER,
                Style::default()
                    .fg(ctx.theme.success)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(COPY_MARKER, Style::default().fg(ctx.theme.muted))
        };
        Ok(vec![Line::from(control)])
    }
}

#[derive(Debug, Clone, Default)]
struct ViewColumn {
    width: u16,
    lines: Vec<Line<'static>>,
    reveal_on_hover: bool,
}

/// Laid-out message, ready to be stacked into a list
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    columns: Vec<ViewColumn>,
}

impl MessageView {
    pub fn height(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.lines.len())
            .max()
            .unwrap_or(0)
    }

    /// Merge the columns row by row
    ///
    /// Hover-only columns are blanked unless `reveal` is set; their width is
    /// kept so the layout does not shift.
    pub fn lines(&self, reveal: bool) -> Vec<Line<'static>> {
        let last = self.columns.len().saturating_sub(1);
        (0..self.height())
            .map(|row| {
                let mut spans = Vec::new();
                for (i, column) in self.columns.iter().enumerate() {
                    let mut used = 0;
                    let visible = reveal || !column.reveal_on_hover;
                    if let (true, Some(line)) = (visible, column.lines.get(row)) {
                        used = line.width();
                        spans.extend(
                            line.spans
                                .iter()
                                .cloned()
                                .map(|span| span.patch_style(line.style)),
                        );
                    }
                    if i < last {
                        let pad = usize::from(column.width).saturating_sub(used)
                            + usize::from(COLUMN_GAP);
                        spans.push(Span::raw(" ".repeat(pad)));
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}

/// Container that provides the message context to its parts
pub struct ChatMessage {
    message: Arc<Message>,
    is_last: bool,
    parts: Vec<Box<dyn MessagePart>>,
}

impl ChatMessage {
    /// Message with the default Avatar, Content and Actions parts
    pub fn new(message: Arc<Message>, is_last: bool) -> Self {
        Self {
            message,
            is_last,
            parts: default_parts(),
        }
    }

    /// Replace the parts; they are laid out in the given order
    pub fn children(mut self, parts: Vec<Box<dyn MessagePart>>) -> Self {
        self.parts = parts;
        self
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> Result<MessageView, ScopeError> {
        let widths = column_widths(&self.parts, ctx.width);
        let context = MessageContext::new(Arc::clone(&self.message), self.is_last);

        provide_chat_message(context, || {
            let mut columns = Vec::with_capacity(self.parts.len());
            for (part, width) in self.parts.iter().zip(widths) {
                columns.push(ViewColumn {
                    width,
                    lines: part.render(ctx, width)?,
                    reveal_on_hover: part.reveal_on_hover(),
                });
            }
            Ok(MessageView { columns })
        })
    }
}

fn default_parts() -> Vec<Box<dyn MessagePart>> {
    vec![
        Box::new(Avatar::new()),
        Box::new(Content::new()),
        Box::new(Actions::new()),
    ]
}

/// Fixed columns get their width, fill columns split the rest
fn column_widths(parts: &[Box<dyn MessagePart>], total: u16) -> Vec<u16> {
    let gaps = COLUMN_GAP.saturating_mul(parts.len().saturating_sub(1) as u16);
    let fixed: u16 = parts
        .iter()
        .filter_map(|p| match p.column() {
            Column::Fixed(w) => Some(w),
            Column::Fill => None,
        })
        .fold(0, u16::saturating_add);
    let fills = parts
        .iter()
        .filter(|p| p.column() == Column::Fill)
        .count()
        .max(1) as u16;
    let fill = (total.saturating_sub(fixed).saturating_sub(gaps) / fills).max(1);

    parts
        .iter()
        .map(|p| match p.column() {
            Column::Fixed(w) => w,
            Column::Fill => fill,
        })
        .collect()
}

/// Whether a message can keep its previous render
///
/// Skips only when the message is not the last one, its last-ness did not
/// change, and it is the very same `Arc`. The last message always renders.
pub fn should_skip_render(prev: &MessageContext, next: &MessageContext) -> bool {
    !next.is_last && prev.is_last == next.is_last && Arc::ptr_eq(&prev.message, &next.message)
}

/// Builds custom parts for every render of a memoized message
pub type PartsFactory = Rc<dyn Fn() -> Vec<Box<dyn MessagePart>>>;

/// A `ChatMessage` with its last view cached
pub struct MemoChatMessage {
    props: MessageContext,
    parts: Option<PartsFactory>,
    view: MessageView,
    /// Width and copy flag the cached view was built for
    rendered_for: Option<(u16, bool)>,
    render_count: usize,
}

impl MemoChatMessage {
    pub fn new(message: Arc<Message>, is_last: bool) -> Self {
        Self {
            props: MessageContext::new(message, is_last),
            parts: None,
            view: MessageView::default(),
            rendered_for: None,
            render_count: 0,
        }
    }

    pub fn with_parts(mut self, parts: PartsFactory) -> Self {
        self.parts = Some(parts);
        self
    }

    /// Hand in new props; returns true when the cached view was dropped
    pub fn update(&mut self, message: Arc<Message>, is_last: bool) -> bool {
        let next = MessageContext::new(message, is_last);
        if should_skip_render(&self.props, &next) {
            return false;
        }
        self.props = next;
        self.rendered_for = None;
        true
    }

    /// Cached view, rebuilt when props, width or copy feedback changed
    pub fn view(&mut self, ctx: &RenderContext<'_>) -> Result<&MessageView, ScopeError> {
        let key = (ctx.width, ctx.is_copied);
        if self.rendered_for != Some(key) {
            let mut message = ChatMessage::new(Arc::clone(&self.props.message), self.props.is_last);
            if let Some(parts) = &self.parts {
                message = message.children(parts());
            }
            self.view = message.render(ctx)?;
            self.rendered_for = Some(key);
            self.render_count += 1;
            tracing::trace!(
                role = %self.props.message.role,
                is_last = self.props.is_last,
                renders = self.render_count,
                "Rendered chat message"
            );
        }
        Ok(&self.view)
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn message(&self) -> &Arc<Message> {
        &self.props.message
    }

    pub fn is_last(&self) -> bool {
        self.props.is_last
    }

    /// Text the copy action writes
    pub fn copy_content(&self) -> &str {
        &self.props.message.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::handler::use_chat;
    use crate::chat::DocumentFile;
    use crate::theme::Theme;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn rendered(memo: &mut MemoChatMessage, theme: &Theme) -> usize {
        let ctx = RenderContext::new(theme).with_width(40);
        memo.view(&ctx).unwrap();
        memo.render_count()
    }

    #[test]
    fn unchanged_non_last_message_renders_once() {
        let theme = Theme::default();
        let message = Arc::new(Message::assistant("hi"));
        let mut memo = MemoChatMessage::new(Arc::clone(&message), false);

        assert_eq!(rendered(&mut memo, &theme), 1);
        for _ in 0..5 {
            assert!(!memo.update(Arc::clone(&message), false));
            assert_eq!(rendered(&mut memo, &theme), 1);
        }
    }

    #[test]
    fn each_is_last_transition_renders_once() {
        let theme = Theme::default();
        let message = Arc::new(Message::assistant("hi"));
        let mut memo = MemoChatMessage::new(Arc::clone(&message), false);
        rendered(&mut memo, &theme);

        memo.update(Arc::clone(&message), true);
        assert_eq!(rendered(&mut memo, &theme), 2);
        assert_eq!(rendered(&mut memo, &theme), 2);

        memo.update(Arc::clone(&message), false);
        assert_eq!(rendered(&mut memo, &theme), 3);
        memo.update(Arc::clone(&message), false);
        assert_eq!(rendered(&mut memo, &theme), 3);
    }

    #[test]
    fn last_message_always_renders() {
        let theme = Theme::default();
        let message = Arc::new(Message::assistant("Hel"));
        let mut memo = MemoChatMessage::new(Arc::clone(&message), true);
        rendered(&mut memo, &theme);

        assert!(memo.update(Arc::new(message.appended("lo")), true));
        assert_eq!(rendered(&mut memo, &theme), 2);

        // Same pointer while last still re-renders
        let same = Arc::clone(memo.message());
        assert!(memo.update(same, true));
        assert_eq!(rendered(&mut memo, &theme), 3);
    }

    #[test]
    fn identity_not_equality_decides() {
        let message = Arc::new(Message::user("same text"));
        let prev = MessageContext::new(Arc::clone(&message), false);

        let equal_copy = MessageContext::new(Arc::new(Message::user("same text")), false);
        assert!(!should_skip_render(&prev, &equal_copy));

        let same = MessageContext::new(Arc::clone(&message), false);
        assert!(should_skip_render(&prev, &same));
    }

    #[test]
    fn copy_feedback_and_width_invalidate_the_cache() {
        let theme = Theme::default();
        let mut memo = MemoChatMessage::new(Arc::new(Message::assistant("hi")), false);
        let ctx = RenderContext::new(&theme).with_width(40);
        memo.view(&ctx).unwrap();

        memo.view(&ctx.with_copied(true)).unwrap();
        assert_eq!(memo.render_count(), 2);

        memo.view(&ctx.with_copied(true).with_width(60)).unwrap();
        assert_eq!(memo.render_count(), 3);
    }

    #[test]
    fn default_parts_render_in_order() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme).with_width(30);
        let view = ChatMessage::new(Arc::new(Message::assistant("Hello")), true)
            .render(&ctx)
            .unwrap();

        let row = text(&view.lines(true)[0]);
        assert!(row.starts_with(ASSISTANT_AVATAR));
        assert!(row.contains("Hello"));
        assert!(row.trim_end().ends_with(COPY_MARKER));
    }

    #[test]
    fn actions_hidden_until_revealed() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme).with_width(30).with_copied(true);
        let view = ChatMessage::new(Arc::new(Message::user("Hey")), false)
            .render(&ctx)
            .unwrap();

        assert!(!text(&view.lines(false)[0]).contains(COPIED_MARKER));
        assert!(text(&view.lines(true)[0]).contains(COPIED_MARKER));
        // Hiding keeps the row width
        assert_eq!(view.lines(false)[0].width(), view.lines(true)[0].width());
    }

    #[test]
    fn children_override_defaults() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme).with_width(30);
        let view = ChatMessage::new(Arc::new(Message::user("ignored")), false)
            .children(vec![
                Box::new(Avatar::with_children(vec![Line::raw("A")])),
                Box::new(Content::new()),
            ])
            .render(&ctx)
            .unwrap();

        let row = text(&view.lines(false)[0]);
        assert!(row.starts_with("A "));
        assert!(row.contains("ignored"));
    }

    #[test]
    fn unknown_role_gets_fallback_avatar() {
        assert_eq!(Avatar::marker(&Role::Other("tool".into())), FALLBACK_AVATAR);
        assert_eq!(Avatar::marker(&Role::User), USER_AVATAR);
    }

    #[test]
    fn part_outside_message_is_scope_error() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme);
        let err = Avatar::new().render(&ctx, 3).unwrap_err();
        assert_eq!(err.accessor, "use_chat_message");
    }

    struct NeedsChat;

    impl MessagePart for NeedsChat {
        fn render(
            &self,
            _ctx: &RenderContext<'_>,
            _width: u16,
        ) -> Result<Vec<Line<'static>>, ScopeError> {
            let chat = use_chat()?;
            Ok(vec![Line::raw(format!("{} messages", chat.messages().len()))])
        }
    }

    #[test]
    fn scope_error_propagates_out_of_render() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme);
        let err = ChatMessage::new(Arc::new(Message::user("x")), true)
            .children(vec![Box::new(NeedsChat)])
            .render(&ctx)
            .unwrap_err();
        assert!(err.to_string().contains("ChatProvider"));
    }

    #[test]
    fn attachments_render_as_cards() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme).with_width(50);
        let message = Message::assistant("See file").with_attachments(vec![DocumentFile::new(
            "d1", "report.pdf", "pdf",
        )
        .with_size(1536)
        .with_url("report.pdf")]);
        let view = ChatMessage::new(Arc::new(message), true)
            .render(&ctx)
            .unwrap();

        let all: Vec<String> = view.lines(false).iter().map(text).collect();
        assert!(all.iter().any(|l| l.contains("[1] ▤ report.pdf (1.5 KB)")));
        assert!(all.iter().any(|l| l.contains("PDF File")));
    }
}
