//! # Reply Timer
//!
//! Simulated assistant latency. Scheduling a reply spawns a tokio task that
//! sleeps, then sends `Action::ReplyDue(ticket)` back to the event loop.
//! The task is aborted on `cancel()` and when the timer is dropped, so a
//! torn-down view never receives a late reply.

use std::sync::mpsc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::AbortHandle;

use crate::core::action::Action;
use crate::core::state::PendingReply;

#[derive(Default)]
pub struct ReplyTimer {
    handle: Option<AbortHandle>,
}

impl ReplyTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the countdown for `pending`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, pending: PendingReply, delay: Duration, tx: mpsc::Sender<Action>) {
        self.cancel();
        let ticket = pending.ticket;
        debug!("Scheduling reply {:?} in {:?}", ticket, delay);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Action::ReplyDue(ticket)).is_err() {
                warn!("Failed to deliver reply {:?}: receiver dropped", ticket);
            }
        });
        self.handle = Some(task.abort_handle());
    }

    /// Abort the outstanding countdown, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Aborting pending reply timer");
            }
            handle.abort();
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ReplyTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{ReplyKind, ReplyTicket};

    fn pending(n: u64) -> PendingReply {
        PendingReply {
            ticket: ReplyTicket(n),
            kind: ReplyKind::Typed,
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ReplyTimer::new();
        timer.schedule(pending(1), Duration::from_millis(1500), tx);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert!(rx.try_recv().is_err(), "must not fire early");
        assert!(timer.is_scheduled());

        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(rx.try_recv().ok(), Some(Action::ReplyDue(ReplyTicket(1))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_delivery() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ReplyTimer::new();
        timer.schedule(pending(1), Duration::from_millis(1500), tx);
        timer.cancel();
        assert!(!timer.is_scheduled());

        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_prevents_delivery() {
        let (tx, rx) = mpsc::channel();
        {
            let mut timer = ReplyTimer::new();
            timer.schedule(pending(2), Duration::from_millis(100), tx);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
