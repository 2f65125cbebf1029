//! Debouncing and staleness control for prediction recomputation.
//!
//! Each recomputation is tagged with a `PredictionTicket`. Only a result
//! carrying the most recently issued ticket may be applied; anything older
//! is dropped (last writer wins).

use std::time::{Duration, Instant};

/// Coalesces bursts of triggers into one firing after `delay` of quiet.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    /// Zero delay means callers should recompute inline.
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// Restart the quiet period at `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn cancel(&mut self) {
        self.pending_since = None;
    }

    /// True (once) when a trigger is pending and `delay` has passed since it.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredictionTicket(u64);

impl PredictionTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct PredictionScheduler {
    latest: u64,
}

impl PredictionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn issue(&mut self) -> PredictionTicket {
        self.latest += 1;
        PredictionTicket(self.latest)
    }

    pub fn is_current(&self, ticket: PredictionTicket) -> bool {
        ticket.0 == self.latest
    }
}
