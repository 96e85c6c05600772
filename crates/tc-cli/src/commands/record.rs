//! Check-in, check-out and adjustment commands.
//!
//! Each run replays the log to find the current state, validates the
//! request against it and appends at most one event.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tc_core::{Command, Event};
use tc_store::EventLog;

/// Records the event authorized by `command`.
///
/// Nothing is written when the command is rejected.
pub fn run<W: Write>(
    writer: &mut W,
    log: &EventLog,
    command: &Command,
    now: DateTime<Utc>,
) -> Result<()> {
    let events = log
        .load()
        .with_context(|| format!("failed to load {}", log.path().display()))?;
    let current = tc_core::status(&events, now);

    let Some(event) = tc_core::authorize(command, current.checked_in, now)? else {
        return Ok(());
    };

    log.append(&event)
        .with_context(|| format!("failed to write {}", log.path().display()))?;
    tracing::info!(op = %event.op(), "recorded event");

    match &event {
        Event::CheckIn { comment, .. } => confirm(writer, "CHECKED IN", comment.as_deref())?,
        Event::CheckOut { comment, .. } => confirm(writer, "CHECKED OUT", comment.as_deref())?,
        Event::Adjust { minutes } => writeln!(writer, "ADJUSTED: {minutes:+} minutes")?,
    }

    Ok(())
}

fn confirm<W: Write>(writer: &mut W, action: &str, comment: Option<&str>) -> Result<()> {
    match comment {
        Some(comment) => writeln!(writer, "{action}: {comment}")?,
        None => writeln!(writer, "{action}")?,
    }
    Ok(())
}
