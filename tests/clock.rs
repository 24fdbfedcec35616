//! Integration tests for the tokio interval clock driver.

use rugby_scoring_web::logic::{ClockDriver, IntervalClock, TickFn};
use rugby_scoring_web::MatchId;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PERIOD: Duration = Duration::from_millis(10);

fn counting_clock(limit: u32) -> (IntervalClock, Arc<AtomicU32>) {
    let ticks = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&ticks);
    let on_tick: TickFn = Arc::new(move |_: MatchId| counter.fetch_add(1, Ordering::SeqCst) + 1 < limit);
    (IntervalClock::new(PERIOD, on_tick), ticks)
}

#[tokio::test]
async fn ticks_while_started_and_freezes_when_stopped() {
    let (mut clock, ticks) = counting_clock(u32::MAX);
    let id = uuid::Uuid::new_v4();

    clock.start(id);
    assert!(clock.is_ticking(id));
    tokio::time::sleep(PERIOD * 10).await;
    clock.stop(id);
    assert!(!clock.is_ticking(id));

    let frozen = ticks.load(Ordering::SeqCst);
    assert!(frozen >= 3, "only {frozen} ticks");
    tokio::time::sleep(PERIOD * 5).await;
    assert_eq!(ticks.load(Ordering::SeqCst), frozen);
}

#[tokio::test]
async fn starting_twice_keeps_a_single_ticker() {
    let (mut clock, _ticks) = counting_clock(u32::MAX);
    let id = uuid::Uuid::new_v4();
    clock.start(id);
    clock.start(id);
    assert_eq!(clock.active(), 1);
    clock.stop(id);
    assert_eq!(clock.active(), 0);
}

#[tokio::test]
async fn ticker_ends_when_the_match_stops_advancing() {
    let (mut clock, ticks) = counting_clock(3);
    let id = uuid::Uuid::new_v4();
    clock.start(id);
    tokio::time::sleep(PERIOD * 10).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
    assert!(!clock.is_ticking(id));
}
