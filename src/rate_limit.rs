//! Shared call budget against the pricing API.
//!
//! Two independent ceilings apply: a per-day budget and a per-minute budget.
//! The minute window rolls lazily: the first check or record after the
//! deadline zeroes the minute counter and opens a new window starting at that
//! moment. The day counter rolls over when the UTC calendar date changes.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::clock::{to_chrono, Clock};
use crate::config;

#[derive(Debug, Clone)]
struct RateLimitState {
    calls_today: u32,
    calls_this_minute: u32,
    minute_window_reset_at: DateTime<Utc>,
    day: NaiveDate,
}

/// Snapshot of the limiter counters, as reported by the usage stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitSnapshot {
    pub calls_today: u32,
    pub daily_limit: u32,
    pub calls_this_minute: u32,
    pub minute_limit: u32,
    pub next_minute_reset: DateTime<Utc>,
}

pub struct RateLimiter {
    daily_limit: u32,
    minute_limit: u32,
    clock: Arc<dyn Clock>,
    state: Mutex<RateLimitState>,
}

impl RateLimiter {
    /// Create a limiter with the default 200/day and 60/minute budgets.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(config::DAILY_LIMIT, config::MINUTE_LIMIT, clock)
    }

    pub fn with_limits(daily_limit: u32, minute_limit: u32, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            daily_limit,
            minute_limit,
            state: Mutex::new(RateLimitState {
                calls_today: 0,
                calls_this_minute: 0,
                minute_window_reset_at: now + to_chrono(config::MINUTE_WINDOW),
                day: now.date_naive(),
            }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RateLimitState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Roll the minute window and the day counter forward if their deadlines passed.
    fn roll(&self, state: &mut RateLimitState) {
        let now = self.clock.now();
        if now > state.minute_window_reset_at {
            state.calls_this_minute = 0;
            state.minute_window_reset_at = now + to_chrono(config::MINUTE_WINDOW);
        }
        let today = now.date_naive();
        if today != state.day {
            log::info!(
                "Daily API budget rolled over ({} calls on {})",
                state.calls_today,
                state.day
            );
            state.calls_today = 0;
            state.day = today;
        }
    }

    fn has_budget(&self, state: &RateLimitState) -> bool {
        state.calls_today < self.daily_limit && state.calls_this_minute < self.minute_limit
    }

    /// Whether another upstream call fits in both budgets right now.
    pub fn can_proceed(&self) -> bool {
        let mut state = self.lock();
        self.roll(&mut state);
        self.has_budget(&state)
    }

    /// Count one upstream call attempt against both budgets.
    ///
    /// Increments unconditionally; callers check [`can_proceed`](Self::can_proceed)
    /// first, or use [`try_acquire`](Self::try_acquire).
    pub fn record_call(&self) {
        let mut state = self.lock();
        self.roll(&mut state);
        state.calls_today += 1;
        state.calls_this_minute += 1;
    }

    /// Check and record under one lock. Returns `false` without counting
    /// anything when either budget is exhausted.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.lock();
        self.roll(&mut state);
        if !self.has_budget(&state) {
            log::warn!(
                "API rate limit reached ({}/{} today, {}/{} this minute)",
                state.calls_today,
                self.daily_limit,
                state.calls_this_minute,
                self.minute_limit
            );
            return false;
        }
        state.calls_today += 1;
        state.calls_this_minute += 1;
        true
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        let mut state = self.lock();
        self.roll(&mut state);
        RateLimitSnapshot {
            calls_today: state.calls_today,
            daily_limit: self.daily_limit,
            calls_this_minute: state.calls_this_minute,
            minute_limit: self.minute_limit,
            next_minute_reset: state.minute_window_reset_at,
        }
    }
}
