//! # Conversation State
//!
//! The conversation is the aggregate root: the transcript plus whether the
//! assistant is "typing". It has no UI types in it. Presentation state lives
//! in the `tui` module.
//!
//! ```text
//! Conversation
//! ├── messages: Vec<Message>        // append-only transcript
//! ├── pending: Option<PendingReply> // outstanding simulated reply
//! ├── replies: CannedReplies        // what the assistant will say
//! ├── next_id: u64                  // id for the next message
//! ├── next_ticket: u64              // id for the next scheduled reply
//! └── live: bool                    // false once torn down
//! ```
//!
//! ```text
//!            submit_user_text / select_quick_reply
//!   ┌──────┐ ─────────────────────────────────────▶ ┌───────────────┐
//!   │ Idle │                                        │ AwaitingReply │
//!   └──────┘ ◀───────────────────────────────────── └───────────────┘
//!                  deferred_reply(matching ticket)
//! ```
//!
//! State changes go through these methods (usually via `update()` in
//! action.rs). Fields are private so nothing can write around them.

use log::{debug, info};

use crate::core::message::{Message, MessageId};
use crate::core::script::{CannedReplies, ReplyTemplate, seed_transcript};

/// Whether the assistant is currently composing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
}

/// Which canned answer an outstanding reply will produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Typed,
    QuickReply,
}

/// Identifies one scheduled reply. A fire with any other ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    pub kind: ReplyKind,
}

pub struct Conversation {
    messages: Vec<Message>,
    pending: Option<PendingReply>,
    replies: CannedReplies,
    next_id: u64,
    next_ticket: u64,
    live: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(CannedReplies::default())
    }
}

impl Conversation {
    /// Start a session from the seed transcript.
    pub fn new(replies: CannedReplies) -> Self {
        Self::with_transcript(seed_transcript(), replies)
    }

    pub fn with_transcript(messages: Vec<Message>, replies: CannedReplies) -> Self {
        let next_id = messages.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
        Self {
            messages,
            pending: None,
            replies,
            next_id,
            next_ticket: 1,
            live: true,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_composing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.is_composing() {
            Phase::AwaitingReply
        } else {
            Phase::Idle
        }
    }

    pub fn pending(&self) -> Option<PendingReply> {
        self.pending
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Append what the user typed. Whitespace-only text is ignored.
    ///
    /// Returns the reply to schedule, or `None` if nothing happened.
    pub fn submit_user_text(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            debug!("Ignoring empty submission");
            return None;
        }
        self.begin_turn(text, ReplyKind::Typed)
    }

    /// Append the chosen quick reply as if the user had typed it.
    pub fn select_quick_reply(&mut self, reply: &str) -> Option<PendingReply> {
        self.begin_turn(reply, ReplyKind::QuickReply)
    }

    /// Complete the outstanding turn with the canned answer.
    ///
    /// Returns the id of the appended assistant message, or `None` when the
    /// ticket is stale, nothing is pending, or the conversation is closed.
    pub fn deferred_reply(&mut self, ticket: ReplyTicket) -> Option<MessageId> {
        if !self.live {
            debug!("Dropping reply {:?}: conversation torn down", ticket);
            return None;
        }
        let pending = match self.pending {
            Some(p) if p.ticket == ticket => p,
            Some(p) => {
                debug!("Dropping stale reply {:?} (outstanding {:?})", ticket, p.ticket);
                return None;
            }
            None => {
                debug!("Dropping reply {:?}: nothing pending", ticket);
                return None;
            }
        };

        let id = self.allocate_id();
        let template: &ReplyTemplate = match pending.kind {
            ReplyKind::Typed => &self.replies.typed,
            ReplyKind::QuickReply => &self.replies.quick_reply,
        };
        self.messages.push(template.to_message(id));
        self.pending = None;
        info!("Assistant replied (id={}, kind={:?})", id, pending.kind);
        Some(id)
    }

    /// Close the conversation. Any reply still in flight is forgotten.
    pub fn teardown(&mut self) {
        if let Some(p) = self.pending.take() {
            info!("Teardown cancelled pending reply {:?}", p.ticket);
        }
        self.live = false;
    }

    fn begin_turn(&mut self, text: &str, kind: ReplyKind) -> Option<PendingReply> {
        if !self.live {
            return None;
        }
        // One outstanding turn at a time
        if let Some(p) = self.pending {
            debug!("Ignoring submission while reply {:?} is pending", p.ticket);
            return None;
        }

        let id = self.allocate_id();
        self.messages.push(Message::user(id, text));

        let pending = PendingReply {
            ticket: ReplyTicket(self.next_ticket),
            kind,
        };
        self.next_ticket += 1;
        self.pending = Some(pending);
        info!("User message {} accepted ({:?}), awaiting reply", id, kind);
        Some(pending)
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }
}
