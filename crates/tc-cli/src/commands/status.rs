//! Status command: current state plus today / this week / last week totals.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tc_store::EventLog;

use super::report::{format_report, generate_report};

/// Prints the status report for `now`, as text or JSON.
pub fn run<W: Write>(
    writer: &mut W,
    log: &EventLog,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let events = log
        .load()
        .with_context(|| format!("failed to load {}", log.path().display()))?;
    let report = generate_report(&events, now);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)
            .context("failed to serialize report")?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }

    Ok(())
}
