use std::sync::mpsc;
use std::time::Duration;

use diskarte::core::action::{Action, Effect, update};
use diskarte::core::message::Author;
use diskarte::core::script::CannedReplies;
use diskarte::core::state::{Conversation, Phase};
use diskarte::tui::reply_timer::ReplyTimer;

// ============================================================================
// Helper Functions
// ============================================================================

/// Let spawned timer tasks run after the paused clock has advanced.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Submit, wait out the timer, and feed the reply back like the event loop does.
async fn round_trip(convo: &mut Conversation, action: Action, delay: Duration) -> Effect {
    let (tx, rx) = mpsc::channel();
    let mut timer = ReplyTimer::new();

    let Effect::ScheduleReply(pending) = update(convo, action) else {
        panic!("expected a scheduled reply");
    };
    timer.schedule(pending, delay, tx);

    tokio::time::sleep(delay + Duration::from_millis(1)).await;
    settle().await;
    let due = rx.try_recv().expect("reply should be due");
    update(convo, due)
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typed_message_gets_paragraph_reply() {
    let mut convo = Conversation::default();
    assert_eq!(convo.messages().len(), 3);

    let effect = round_trip(
        &mut convo,
        Action::Submit("I need a cover letter".into()),
        Duration::from_millis(1500),
    )
    .await;

    assert_eq!(effect, Effect::Replied);
    assert_eq!(convo.phase(), Phase::Idle);
    let messages = convo.messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[3].author, Author::User);
    assert_eq!(messages[3].content, "I need a cover letter");
    assert_eq!(messages[4].author, Author::Assistant);
    assert!(!messages[4].is_list);
    assert_eq!(messages[4].quick_replies, vec!["Tell me more", "Show examples", "Next steps"]);
}

#[tokio::test(start_paused = true)]
async fn test_quick_reply_gets_list_reply() {
    let mut convo = Conversation::default();
    round_trip(
        &mut convo,
        Action::SelectQuickReply("Find Jobs".into()),
        Duration::from_millis(1500),
    )
    .await;

    let messages = convo.messages();
    assert_eq!(messages[3].content, "Find Jobs");
    assert!(messages[4].is_list);
    assert!(messages[4].content.contains("• Use action verbs"));
}

#[tokio::test(start_paused = true)]
async fn test_indicator_visible_only_until_reply() {
    let mut convo = Conversation::default();
    let (tx, rx) = mpsc::channel();
    let mut timer = ReplyTimer::new();

    let Effect::ScheduleReply(pending) = update(&mut convo, Action::Submit("hello".into())) else {
        panic!("expected a scheduled reply");
    };
    timer.schedule(pending, Duration::from_millis(1500), tx);
    assert!(convo.is_composing());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    settle().await;
    assert!(rx.try_recv().is_err());
    assert!(convo.is_composing());
    assert_eq!(convo.messages().len(), 4);

    tokio::time::sleep(Duration::from_millis(600)).await;
    settle().await;
    let due = rx.try_recv().expect("reply should be due");
    update(&mut convo, due);
    assert!(!convo.is_composing());
    assert_eq!(convo.messages().len(), 5);
}

#[test]
fn test_whitespace_submission_is_a_no_op() {
    let mut convo = Conversation::default();
    assert_eq!(update(&mut convo, Action::Submit("   \n\t".into())), Effect::None);
    assert_eq!(convo.messages().len(), 3);
    assert!(!convo.is_composing());
}

#[test]
fn test_second_submission_rejected_while_composing() {
    let mut convo = Conversation::default();
    assert!(matches!(
        update(&mut convo, Action::Submit("first".into())),
        Effect::ScheduleReply(_)
    ));
    assert_eq!(update(&mut convo, Action::Submit("second".into())), Effect::None);
    assert_eq!(
        update(&mut convo, Action::SelectQuickReply("Find Jobs".into())),
        Effect::None
    );
    assert_eq!(convo.messages().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_quit_before_reply_leaves_transcript_untouched() {
    let mut convo = Conversation::new(CannedReplies::default());
    let (tx, rx) = mpsc::channel();
    let mut timer = ReplyTimer::new();

    let Effect::ScheduleReply(pending) = update(&mut convo, Action::Submit("hello".into())) else {
        panic!("expected a scheduled reply");
    };
    timer.schedule(pending, Duration::from_millis(1500), tx);

    assert_eq!(update(&mut convo, Action::Quit), Effect::Quit);
    timer.cancel();

    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;
    assert!(rx.try_recv().is_err());

    // A late ticket is refused even if it slips through
    assert_eq!(update(&mut convo, Action::ReplyDue(pending.ticket)), Effect::None);
    assert_eq!(convo.messages().len(), 4);
}
