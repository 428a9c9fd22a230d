//! Tests for the debounce scheduler

use super::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Instant, advance};

const WINDOW: Duration = Duration::from_millis(500);

fn scheduler() -> (DebounceScheduler, UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceScheduler::new(WINDOW, 3, tx), rx)
}

fn ctx(id: ContextId, text: &str) -> EditContext {
    EditContext {
        context_id: id,
        text: text.to_string(),
        cursor: text.chars().count(),
    }
}

/// Let spawned timer tasks observe the current (paused) clock
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// The paused clock lands on timer deadlines, give or take tick rounding
fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "expected ~{:?}, got {:?}",
        expected,
        elapsed
    );
}

fn fired(event: EngineEvent) -> (EditContext, u64) {
    match event {
        EngineEvent::Fire {
            context,
            generation,
        } => (context, generation),
        other => panic!("Expected Fire, got {:?}", other),
    }
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn test_validate_empty_and_whitespace() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let scheduler = DebounceScheduler::new(WINDOW, 3, tx);
    assert_eq!(scheduler.validate(""), Err(SkipReason::Empty));
    assert_eq!(scheduler.validate(" \n\t "), Err(SkipReason::Empty));
}

#[test]
fn test_validate_min_length_boundary() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let scheduler = DebounceScheduler::new(WINDOW, 3, tx);
    assert_eq!(
        scheduler.validate("Hi"),
        Err(SkipReason::TooShort { len: 2, min: 3 })
    );
    assert_eq!(scheduler.validate("Hi!"), Ok(()));
}

#[test]
fn test_validate_counts_chars() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let scheduler = DebounceScheduler::new(WINDOW, 3, tx);
    // Two chars, four bytes
    assert!(scheduler.validate("éé").is_err());
}

// =========================================================================
// Timing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_fires_after_window() {
    let (mut scheduler, mut rx) = scheduler();
    let start = Instant::now();

    let outcome = scheduler.schedule(ctx(ContextId::Document, "Hi!"));
    assert_eq!(outcome, ScheduleOutcome::Scheduled);
    assert!(scheduler.is_pending(ContextId::Document));

    let (context, generation) = fired(rx.recv().await.unwrap());
    assert_eq!(context.text, "Hi!");
    assert_elapsed(start, WINDOW);
    assert!(scheduler.take_fired(ContextId::Document, generation));
    assert_eq!(scheduler.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_window_starts_at_schedule_call_not_first_poll() {
    let (mut scheduler, mut rx) = scheduler();
    let start = Instant::now();

    scheduler.schedule(ctx(ContextId::Document, "Slow frame"));
    // The clock moves before the timer task has had a chance to run
    advance(Duration::from_millis(300)).await;

    let (context, _) = fired(rx.recv().await.unwrap());
    assert_eq!(context.text, "Slow frame");
    assert_elapsed(start, WINDOW);
}

#[tokio::test(start_paused = true)]
async fn test_nothing_fires_before_window() {
    let (mut scheduler, mut rx) = scheduler();
    scheduler.schedule(ctx(ContextId::Document, "Some text"));

    settle().await;
    advance(Duration::from_millis(499)).await;
    settle().await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_burst_coalesces_into_last_edit() {
    let (mut scheduler, mut rx) = scheduler();
    let start = Instant::now();
    let edits = ["The d", "The do", "The doo", "The door", "The door creaked"];

    for (i, text) in edits.iter().enumerate() {
        if i > 0 {
            advance(Duration::from_millis(100)).await;
        }
        scheduler.schedule(ctx(ContextId::Document, text));
        settle().await;
    }

    let (context, _) = fired(rx.recv().await.unwrap());
    assert_eq!(context.text, "The door creaked");
    assert_eq!(context.cursor, 16);
    // Window measured from the last call
    assert_elapsed(start, Duration::from_millis(400) + WINDOW);

    settle().await;
    advance(WINDOW * 4).await;
    settle().await;
    assert!(rx.try_recv().is_err(), "Only one fire per burst");
}

#[tokio::test(start_paused = true)]
async fn test_short_text_is_skipped_and_cancels_pending() {
    let (mut scheduler, mut rx) = scheduler();
    scheduler.schedule(ctx(ContextId::Document, "Hello"));
    settle().await;

    let outcome = scheduler.schedule(ctx(ContextId::Document, "He"));
    assert_eq!(
        outcome,
        ScheduleOutcome::Skipped(SkipReason::TooShort { len: 2, min: 3 })
    );
    assert!(!scheduler.is_pending(ContextId::Document));

    settle().await;
    advance(WINDOW * 2).await;
    settle().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_contexts_debounce_independently() {
    let (mut scheduler, mut rx) = scheduler();
    scheduler.schedule(ctx(ContextId::Paragraph(0), "First paragraph"));
    settle().await;
    advance(Duration::from_millis(200)).await;
    scheduler.schedule(ctx(ContextId::Paragraph(1), "Second paragraph"));
    settle().await;

    let (first, _) = fired(rx.recv().await.unwrap());
    let (second, _) = fired(rx.recv().await.unwrap());
    assert_eq!(first.context_id, ContextId::Paragraph(0));
    assert_eq!(second.context_id, ContextId::Paragraph(1));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_stops_every_timer() {
    let (mut scheduler, mut rx) = scheduler();
    for i in 0..3 {
        scheduler.schedule(ctx(ContextId::Paragraph(i), "Some paragraph"));
    }
    assert_eq!(scheduler.pending_count(), 3);

    scheduler.cancel_all();
    assert_eq!(scheduler.pending_count(), 0);

    settle().await;
    advance(WINDOW * 2).await;
    settle().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_stale_fire_is_not_claimed() {
    let (mut scheduler, mut rx) = scheduler();
    scheduler.schedule(ctx(ContextId::Document, "First draft"));
    let (_, old_generation) = fired(rx.recv().await.unwrap());

    // An edit lands after the timer fired but before the engine handled it
    scheduler.schedule(ctx(ContextId::Document, "First draft, revised"));
    assert!(!scheduler.take_fired(ContextId::Document, old_generation));
    assert!(scheduler.is_pending(ContextId::Document));
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_timers() {
    let (mut scheduler, mut rx) = scheduler();
    scheduler.schedule(ctx(ContextId::Document, "Some text"));
    drop(scheduler);

    settle().await;
    advance(WINDOW * 2).await;
    settle().await;
    // Sender dropped with the scheduler and the timer task was cancelled
    assert!(rx.recv().await.is_none());
}
