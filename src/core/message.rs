//! # Messages
//!
//! One turn in the transcript. A `Message` is built once and never edited;
//! the conversation only ever appends new ones.

use std::fmt;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    User,
    Assistant,
}

/// Per-conversation message identifier. Larger ids were created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    /// Body text. May contain `\n`.
    pub content: String,
    /// Render `content` line by line as bullets/paragraphs instead of one block.
    pub is_list: bool,
    /// Suggested replies, in display order. Empty for user messages.
    pub quick_replies: Vec<String>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::User,
            content: content.into(),
            is_list: false,
            quick_replies: Vec::new(),
        }
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::Assistant,
            content: content.into(),
            is_list: false,
            quick_replies: Vec::new(),
        }
    }

    pub fn as_list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn with_quick_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quick_replies = replies.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_quick_replies(&self) -> bool {
        !self.quick_replies.is_empty()
    }
}
