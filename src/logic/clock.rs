//! Match clock: display formatting and the periodic tick driver.
//!
//! Match logic only talks to [`ClockDriver`]; [`IntervalClock`] is the tokio implementation used by
//! the server.

use crate::models::MatchId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Render elapsed match seconds as `M:SS`.
pub fn format_match_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Starts and stops the periodic tick for a match.
pub trait ClockDriver {
    fn start(&mut self, match_id: MatchId);
    fn stop(&mut self, match_id: MatchId);
}

/// Tick callback: advance the given match by one second. Returning false ends that match's ticker.
pub type TickFn = Arc<dyn Fn(MatchId) -> bool + Send + Sync>;

/// One tokio interval task per running match.
pub struct IntervalClock {
    period: Duration,
    on_tick: TickFn,
    tickers: HashMap<MatchId, JoinHandle<()>>,
}

impl IntervalClock {
    pub fn new(period: Duration, on_tick: TickFn) -> Self {
        Self {
            period,
            on_tick,
            tickers: HashMap::new(),
        }
    }

    pub fn is_ticking(&self, match_id: MatchId) -> bool {
        self.tickers
            .get(&match_id)
            .is_some_and(|h| !h.is_finished())
    }

    /// Number of matches with a live ticker.
    pub fn active(&self) -> usize {
        self.tickers.values().filter(|h| !h.is_finished()).count()
    }
}

impl ClockDriver for IntervalClock {
    /// Spawn a ticker unless one is already running for this match.
    fn start(&mut self, match_id: MatchId) {
        if self.is_ticking(match_id) {
            return;
        }
        let on_tick = Arc::clone(&self.on_tick);
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick(match_id) {
                    break;
                }
            }
            log::debug!("Clock ticker for match {} finished", match_id);
        });
        self.tickers.insert(match_id, handle);
    }

    fn stop(&mut self, match_id: MatchId) {
        if let Some(handle) = self.tickers.remove(&match_id) {
            handle.abort();
        }
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        for (_, handle) in self.tickers.drain() {
            handle.abort();
        }
    }
}
