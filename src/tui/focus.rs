//! Keyboard focus over quick-reply chips.
//!
//! Focus is either on the input box (`None`) or on one chip. Tab walks the
//! chips in display order and falls back to the input past the last one.
//! Starting from the input, Tab lands on the newest message's chips first,
//! since those are the ones that answer the current question.

use crate::core::message::Message;
use crate::tui::components::message_list::ReplyTarget;

/// Every chip in the transcript, in display order.
pub fn reply_targets(messages: &[Message]) -> Vec<ReplyTarget> {
    messages
        .iter()
        .enumerate()
        .flat_map(|(message_index, m)| {
            (0..m.quick_replies.len()).map(move |reply_index| ReplyTarget {
                message_index,
                reply_index,
            })
        })
        .collect()
}

pub fn next(messages: &[Message], current: Option<ReplyTarget>) -> Option<ReplyTarget> {
    let targets = reply_targets(messages);
    match current {
        None => {
            let newest = messages.iter().rposition(Message::has_quick_replies)?;
            targets.into_iter().find(|t| t.message_index == newest)
        }
        Some(current) => {
            let pos = targets.iter().position(|t| *t == current)?;
            targets.get(pos + 1).copied()
        }
    }
}

pub fn prev(messages: &[Message], current: Option<ReplyTarget>) -> Option<ReplyTarget> {
    let targets = reply_targets(messages);
    match current {
        None => targets.last().copied(),
        Some(current) => {
            let pos = targets.iter().position(|t| *t == current)?;
            pos.checked_sub(1).map(|p| targets[p])
        }
    }
}
