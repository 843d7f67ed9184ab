// src/crawl/throttle.rs
// =============================================================================
// Politeness throttle shared by every in-flight fetch of one crawl.
//
// A single tokio Interval sits behind a Mutex. Each fetch waits for the next
// tick before it starts, so fetch starts are at least `delay` apart no matter
// how many workers are running.
// =============================================================================

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub(crate) struct Throttle {
    interval: Option<Mutex<Interval>>,
}

impl Throttle {
    // Must be called inside a tokio runtime (Interval registers a timer).
    pub(crate) fn new(delay: Duration) -> Self {
        // tokio::time::interval panics on a zero period
        if delay.is_zero() {
            return Throttle { interval: None };
        }
        let mut ticker = interval(delay);
        // After an idle stretch, resume spacing instead of bursting
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Throttle {
            interval: Some(Mutex::new(ticker)),
        }
    }

    pub(crate) async fn wait(&self) {
        if let Some(interval) = &self.interval {
            interval.lock().await.tick().await;
        }
    }
}
