//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display every message in order, then the typing indicator while composing
//! - Manage scrolling and auto-scroll to the newest content
//! - Hit testing for quick-reply chips
//! - Layout caching (message views and heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//!
//! Messages never change once appended, so a cached `MessageView` and its
//! layout stay valid until the width changes. New messages only extend the
//! cache.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{MessageBubble, MessageLayout, MessageView};
use crate::tui::components::TypingIndicator;
use crate::tui::event::TuiEvent;

/// One quick-reply control, addressed by message and reply position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    pub message_index: usize,
    pub reply_index: usize,
}

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached views and measurements
    pub layout: LayoutCache,
    /// When true, keep the newest content in view
    pub stick_to_bottom: bool,
    /// Where the list was last drawn on screen
    pub viewport: Rect,
    /// True when content exists below the viewport
    pub has_unseen_content: bool,
    /// (message count, composing) at the last render
    seen: (usize, bool),
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport: Rect::default(),
            has_unseen_content: false,
            seen: (0, false),
        }
    }

    fn total_height(&self) -> u16 {
        let indicator = if self.seen.1 { TypingIndicator::HEIGHT } else { 0 };
        self.layout.messages_height() + indicator
    }

    fn max_scroll(&self) -> u16 {
        self.total_height().saturating_sub(self.viewport.height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll so the given chip is visible.
    pub fn scroll_to_target(&mut self, target: ReplyTarget) {
        let Some(chip) = self.layout.chip_rect(target) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        if chip.y < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: chip.y });
            self.stick_to_bottom = false;
        } else if chip.bottom() > offset_y + self.viewport.height {
            let new_y = chip.bottom().saturating_sub(self.viewport.height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_scroll();
        }
    }

    /// Which chip, if any, is drawn at this screen position.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<ReplyTarget> {
        if !self.viewport.contains(Position { x: col, y: row }) {
            return None;
        }
        let content_x = col - self.viewport.x;
        let content_y = (row - self.viewport.y).saturating_add(self.scroll_state.offset().y);
        self.layout.chip_at(content_x, content_y)
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub composing: bool,
    /// Chip with keyboard focus
    pub focused: Option<ReplyTarget>,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        composing: bool,
        focused: Option<ReplyTarget>,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            composing,
            focused,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache (internal mutation)
        self.state.layout.sync(self.messages, content_width);
        self.state.viewport = area;

        // New message or indicator toggled: bring it into view
        let snapshot = (self.messages.len(), self.composing);
        if snapshot != self.state.seen {
            self.state.seen = snapshot;
            self.state.stick_to_bottom = true;
        }

        let messages_height = self.state.layout.messages_height();
        let total_height = self.state.total_height();

        // 2. Position the viewport
        if self.state.stick_to_bottom {
            let max_y = self.state.max_scroll();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let layout = &self.state.layout;
        for i in visible_range {
            let entry = &layout.entries[i];
            let rect = Rect::new(0, layout.top_of(i), content_width, entry.layout.height);
            let focused_reply = self
                .focused
                .filter(|t| t.message_index == i)
                .map(|t| t.reply_index);
            scroll_view.render_widget(
                MessageBubble::new(&entry.view, &entry.layout, focused_reply),
                rect,
            );
        }

        if self.composing {
            let rect = Rect::new(0, messages_height, content_width, TypingIndicator::HEIGHT);
            scroll_view.render_widget(TypingIndicator::new(self.spinner_frame), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // Update auxiliary state
        self.state.has_unseen_content =
            self.state.scroll_state.offset().y < self.state.max_scroll();
    }
}

/// EventHandler lives on `MessageListState` because scrolling needs the
/// persistent offset and stick-to-bottom flag; `MessageList` is rebuilt
/// every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

pub struct CachedMessage {
    pub view: MessageView,
    pub layout: MessageLayout,
}

/// Cached views and layout measurements
pub struct LayoutCache {
    pub entries: Vec<CachedMessage>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Bring the cache up to date with `messages` at `content_width`.
    pub fn sync(&mut self, messages: &[Message], content_width: u16) {
        if content_width != self.content_width || messages.len() < self.entries.len() {
            self.entries.clear();
            self.content_width = content_width;
        }
        if self.entries.len() == messages.len() && self.prefix_heights.len() == messages.len() {
            return;
        }
        for message in &messages[self.entries.len()..] {
            let view = MessageView::build(message);
            let layout = view.layout(content_width);
            self.entries.push(CachedMessage { view, layout });
        }
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .entries
            .iter()
            .scan(0u16, |acc, e| {
                *acc = acc.saturating_add(e.layout.height);
                Some(*acc)
            })
            .collect();
    }

    pub fn messages_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where message `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }

    /// Chip rect in canvas coordinates.
    pub fn chip_rect(&self, target: ReplyTarget) -> Option<Rect> {
        let entry = self.entries.get(target.message_index)?;
        let chip = entry.layout.chips.get(target.reply_index)?;
        Some(Rect {
            y: chip.y + self.top_of(target.message_index),
            ..*chip
        })
    }

    /// Chip drawn at canvas position `(x, y)`.
    pub fn chip_at(&self, x: u16, y: u16) -> Option<ReplyTarget> {
        let message_index = self.prefix_heights.partition_point(|&end| end <= y);
        let entry = self.entries.get(message_index)?;
        let local = Position {
            x,
            y: y - self.top_of(message_index),
        };
        entry
            .layout
            .chips
            .iter()
            .position(|chip| chip.contains(local))
            .map(|reply_index| ReplyTarget {
                message_index,
                reply_index,
            })
    }
}
