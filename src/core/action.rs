//! # Actions
//!
//! Everything that can happen to the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The reply timer fires? That's `Action::ReplyDue(ticket)`.
//!
//! `update()` applies an action to the conversation and returns an `Effect`
//! describing the I/O the adapter should perform. No side effects here.
//!
//! ```text
//! Conversation + Action  →  update()  →  Conversation' + Effect
//! ```

use log::debug;

use crate::core::state::{Conversation, PendingReply, ReplyTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Text submitted from the input field.
    Submit(String),
    /// A quick-reply control was activated.
    SelectQuickReply(String),
    /// The simulated latency for a reply elapsed.
    ReplyDue(ReplyTicket),
    /// The view is going away.
    Quit,
}

/// Work the adapter must do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start the timer for this reply.
    ScheduleReply(PendingReply),
    /// A `ReplyDue` was accepted and the assistant message appended.
    /// Stale tickets give `None` instead.
    Replied,
    Quit,
}

pub fn update(convo: &mut Conversation, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Submit(text) => convo
            .submit_user_text(&text)
            .map_or(Effect::None, Effect::ScheduleReply),
        Action::SelectQuickReply(reply) => convo
            .select_quick_reply(&reply)
            .map_or(Effect::None, Effect::ScheduleReply),
        Action::ReplyDue(ticket) => convo
            .deferred_reply(ticket)
            .map_or(Effect::None, |_| Effect::Replied),
        Action::Quit => {
            convo.teardown();
            Effect::Quit
        }
    }
}
