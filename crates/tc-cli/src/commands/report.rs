//! Report windows and hour formatting for `timecard st`.
//!
//! The working day starts at 08:00 UTC and the working week on Monday at
//! 08:00 UTC. All boundaries are pure functions of the current time.

use std::fmt::Write;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tc_core::{Event, Window};

/// Hour of day (UTC) at which a working day begins.
const DAY_START_HOUR: i64 = 8;

/// Display format for window boundaries.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ========== Window Boundaries ==========

/// 08:00 UTC on the given date.
fn day_start_on(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) + Duration::hours(DAY_START_HOUR)).and_utc()
}

/// Most recent 08:00 boundary at or before `now`.
pub fn today_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let start = day_start_on(now.date_naive());
    if now < start {
        start - Duration::days(1)
    } else {
        start
    }
}

/// Most recent Monday 08:00 at or before `now`.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = today_start(now).date_naive();
    let days_since_monday = today.weekday().num_days_from_monday();
    day_start_on(today - Duration::days(i64::from(days_since_monday)))
}

/// The full week before the current one.
pub fn last_week(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = week_start(now);
    (end - Duration::days(7), end)
}

// ========== Hour Formatting ==========

/// Formats a duration as hours rounded to 3 significant figures.
///
/// Always keeps at least one decimal below 100 hours (`4.5`, `2.0`, `0.0`).
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "hour totals are far below f64 precision limits and log10 fits in i32"
)]
pub fn format_hours(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds();
    if seconds == 0 {
        return "0.0".to_string();
    }

    let hours = seconds as f64 / 3600.0;
    let magnitude = |value: f64| value.abs().log10().floor() as i32;
    let scale = 10f64.powi(2 - magnitude(hours));
    let rounded = (hours * scale).round() / scale;
    // Rounding may carry into the next power of ten (99.96 -> 100).
    let decimals = usize::try_from(2 - magnitude(rounded)).unwrap_or(0);

    let mut text = format!("{rounded:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    text
}

// ========== Report Generation ==========

/// Worked time within one report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowTotal {
    pub label: &'static str,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub seconds: i64,
}

impl WindowTotal {
    fn tally(label: &'static str, events: &[Event], window: Window, now: DateTime<Utc>) -> Self {
        let tally = tc_core::compute(events, window, now);
        Self {
            label,
            start: window.start.unwrap_or(DateTime::UNIX_EPOCH),
            end: window.end,
            seconds: tally.seconds(),
        }
    }
}

/// Computed report data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub checked_in: bool,
    pub windows: Vec<WindowTotal>,
}

/// Builds the today / this week / last week report as of `now`.
pub fn generate_report(events: &[Event], now: DateTime<Utc>) -> Report {
    let (last_start, last_end) = last_week(now);
    Report {
        generated_at: now,
        checked_in: tc_core::status(events, now).checked_in,
        windows: vec![
            WindowTotal::tally("today", events, Window::since(today_start(now)), now),
            WindowTotal::tally("this week", events, Window::since(week_start(now)), now),
            WindowTotal::tally(
                "last week",
                events,
                Window::between(last_start, last_end),
                now,
            ),
        ],
    }
}

/// Renders the report as human-readable lines.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "NOW {} (UTC)",
        report.generated_at.format(DISPLAY_FORMAT)
    );
    let _ = writeln!(
        output,
        "Currently CHECKED {}",
        if report.checked_in { "IN" } else { "OUT" }
    );

    for window in &report.windows {
        let start = window.start.format(DISPLAY_FORMAT);
        let hours = format_hours(Duration::seconds(window.seconds));
        let _ = match window.end {
            Some(end) => writeln!(
                output,
                "Work {} ({start} to {} UTC): {hours} hours",
                window.label,
                end.format(DISPLAY_FORMAT)
            ),
            None => writeln!(output, "Work {} (since {start} UTC): {hours} hours", window.label),
        };
    }

    output
}
