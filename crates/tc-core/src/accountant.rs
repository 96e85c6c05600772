//! Replays the event log into worked-time totals.
//!
//! # Algorithm Summary
//!
//! A single forward pass over the events, tracking whether the card is
//! checked in and when the current session started:
//!
//! 1. Check events outside the window are skipped entirely. Windowing filters
//!    events rather than clipping sessions, so a session straddling a window
//!    edge contributes nothing to that window.
//! 2. A check-out while checked in adds the session length.
//! 3. An adjustment while checked out counts when the most recent check-in
//!    (the anchor) lies strictly inside the window.
//! 4. An open session counts up to `now` only for open-ended windows.
//!
//! Any other combination (checking in twice, adjusting while checked in) is
//! ignored. Replay never fails, even on logs that were edited by hand.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::event::Event;

/// Anchor used for adjustments recorded before any check-in.
fn sentinel_anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Optional inclusive bounds for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Window {
    /// No bounds: the whole log, with an open session counted up to now.
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub const fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether a check event at `at` takes part in the replay.
    fn admits(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }

    /// Whether an adjustment anchored at `anchor` belongs to this window.
    fn anchors(&self, anchor: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start < anchor) && self.end.is_none_or(|end| anchor < end)
    }
}

/// Result of replaying the log over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub elapsed: Duration,
    pub checked_in: bool,
}

impl Tally {
    pub fn seconds(&self) -> i64 {
        self.elapsed.num_seconds()
    }
}

/// Computes worked time within `window` and the checked-in state at the end
/// of the replay.
pub fn compute(events: &[Event], window: Window, now: DateTime<Utc>) -> Tally {
    let mut checked_in = false;
    let mut last_in = sentinel_anchor();
    let mut total = Duration::zero();

    for event in events {
        match event {
            Event::CheckIn { at, .. } | Event::CheckOut { at, .. } if !window.admits(*at) => {}
            Event::CheckIn { at, .. } if !checked_in => {
                checked_in = true;
                last_in = *at;
            }
            Event::CheckOut { at, .. } if checked_in => {
                accumulate(&mut total, *at - last_in);
                checked_in = false;
            }
            Event::Adjust { minutes } if !checked_in && window.anchors(last_in) => {
                // Out-of-range values can only come from a hand-edited log.
                if let Some(delta) = Duration::try_minutes(*minutes) {
                    accumulate(&mut total, delta);
                } else {
                    tracing::warn!(minutes, "ignoring out-of-range adjustment");
                }
            }
            _ => {}
        }
    }

    if checked_in && window.end.is_none() {
        accumulate(&mut total, now - last_in);
    }

    tracing::trace!(
        events = events.len(),
        ?window,
        seconds = total.num_seconds(),
        checked_in,
        "replayed log"
    );

    Tally {
        elapsed: total,
        checked_in,
    }
}

/// Adds `delta` to `total`, leaving `total` unchanged when the sum would
/// leave the representable range.
fn accumulate(total: &mut Duration, delta: Duration) {
    if let Some(sum) = total.checked_add(&delta) {
        *total = sum;
    } else {
        tracing::warn!(
            total = total.num_seconds(),
            delta = delta.num_seconds(),
            "ignoring time that would overflow the total"
        );
    }
}

/// Current state of the card: unbounded replay as of `now`.
pub fn status(events: &[Event], now: DateTime<Utc>) -> Tally {
    compute(events, Window::all(), now)
}
