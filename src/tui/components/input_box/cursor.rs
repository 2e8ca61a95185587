//! Cursor position and horizontal scrolling for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the first visible column.
//! Methods take `buffer: &str` explicitly; the text itself is owned by
//! `InputBox`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First display column shown in the field
    pub scroll_col: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_col: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_col = 0;
    }

    /// Display column of the cursor within the whole buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Scroll just enough to keep the cursor inside a `visible` column window.
    pub fn update_scroll(&mut self, buffer: &str, visible: u16) {
        if visible == 0 {
            self.scroll_col = 0;
            return;
        }
        let visible = usize::from(visible);
        let col = self.column(buffer);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + visible {
            self.scroll_col = col + 1 - visible;
        }
    }

    /// The slice of `buffer` that fits in the window starting at `scroll_col`.
    pub fn visible_text(&self, buffer: &str, visible: u16) -> String {
        let visible = usize::from(visible);
        let mut col: usize = 0;
        let mut out = String::new();
        for c in buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll_col {
                if col + w > self.scroll_col + visible {
                    break;
                }
                out.push(c);
            }
            col += w;
        }
        out
    }

    /// Cursor column relative to the left edge of the visible window.
    pub fn visible_column(&self, buffer: &str) -> u16 {
        let col = self.column(buffer).saturating_sub(self.scroll_col);
        u16::try_from(col).unwrap_or(u16::MAX)
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
