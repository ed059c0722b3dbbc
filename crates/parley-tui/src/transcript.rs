//! Transcript pane: scroll state and rendering.
//!
//! Message text is only ever placed into the buffer through literal spans;
//! nothing in the text is interpreted as markup or styling.

use chrono::{DateTime, Local, Utc};
use parley_core::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Lines scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Animation frames for a pending bubble.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Indent for wrapped message content under its header line.
const CONTENT_INDENT: &str = "  ";

/// Scroll and follow state for the transcript pane.
#[derive(Debug)]
pub struct TranscriptView {
    /// Index of the first visible wrapped line; clamped at render time.
    scroll: usize,
    /// Whether to auto-scroll to the newest message.
    follow: bool,
}

impl TranscriptView {
    /// Create a view in follow mode.
    pub fn new() -> Self {
        Self {
            scroll: 0,
            follow: true,
        }
    }

    /// Current scroll offset in wrapped lines.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Scroll up. Disables follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Scroll down. The render pass clamps to the content length.
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll += amount;
    }

    /// Jump to the newest message and re-enable follow mode.
    pub fn jump_to_end(&mut self) {
        self.follow = true;
    }

    /// Toggle follow mode.
    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
    }
}

impl Default for TranscriptView {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript pane widget.
///
/// ```text
/// ┌─ Transcript ────────────────────────┐
/// │ 12:03 You                            │
/// │   hello                              │
/// │                                      │
/// │ 12:03 Assistant                      │
/// │   | Assistant is composing a reply...│
/// └──────────────────────────────────────┘
/// ```
pub struct TranscriptPane<'a> {
    messages: &'a [Message],
    tick: usize,
}

impl<'a> TranscriptPane<'a> {
    /// Create a pane over the given messages.
    pub fn new(messages: &'a [Message]) -> Self {
        Self { messages, tick: 0 }
    }

    /// Set the tick counter driving the pending-bubble animation.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn role_label(role: Role) -> (&'static str, Style) {
        match role {
            Role::User => (
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Role::Assistant => (
                "Assistant",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Role::Error => (
                "Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        }
    }

    fn time_str(timestamp: DateTime<Utc>) -> String {
        let local: DateTime<Local> = timestamp.into();
        local.format("%H:%M").to_string()
    }

    /// Build the full wrapped line list for the given inner width.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let wrap_width = width.saturating_sub(CONTENT_INDENT.width()).max(1);
        let mut lines: Vec<Line<'static>> = Vec::new();

        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }

            let (label, label_style) = Self::role_label(message.role);
            lines.push(Line::from(vec![
                Span::styled(
                    Self::time_str(message.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(label, label_style),
            ]));

            if message.is_placeholder() {
                let frame = SPINNER[self.tick % SPINNER.len()];
                lines.push(Line::from(vec![
                    Span::raw(CONTENT_INDENT),
                    Span::styled(frame, Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::styled(
                        message.text.clone(),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]));
                continue;
            }

            let body_style = match message.role {
                Role::Error => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            for chunk in textwrap::wrap(&message.text, wrap_width) {
                lines.push(Line::from(vec![
                    Span::raw(CONTENT_INDENT),
                    Span::styled(chunk.into_owned(), body_style),
                ]));
            }
        }

        lines
    }
}

impl StatefulWidget for TranscriptPane<'_> {
    type State = TranscriptView;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptView) {
        let block = Block::default()
            .title(" Transcript ")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(height);

        if state.follow {
            state.scroll = max_scroll;
        } else {
            state.scroll = state.scroll.min(max_scroll);
            // Scrolling back down to the bottom re-engages follow mode.
            if state.scroll == max_scroll {
                state.follow = true;
            }
        }

        let visible: Vec<Line<'static>> = lines
            .into_iter()
            .skip(state.scroll)
            .take(height)
            .collect();
        Paragraph::new(visible).render(inner, buf);
    }
}
