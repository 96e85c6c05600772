//! Legal state transitions for requested commands.

use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use thiserror::Error;

use crate::event::Event;

/// A command requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckIn { comment: Option<String> },
    CheckOut { comment: Option<String> },
    /// Add minutes; the raw argument is validated here.
    Add { minutes: String },
    /// Subtract minutes.
    Sub { minutes: String },
    Status,
}

/// Why a command cannot be applied in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AlreadyCheckedIn,
    AlreadyCheckedOut,
    AdjustWhileCheckedIn,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCheckedIn => write!(f, "Can not check IN. You are already checked IN."),
            Self::AlreadyCheckedOut => {
                write!(f, "Can not check OUT. You are already checked OUT.")
            }
            Self::AdjustWhileCheckedIn => {
                write!(f, "Can not adjust time while a session is open. Check OUT first.")
            }
        }
    }
}

/// Command rejections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command does not fit the current checked-in/out state.
    #[error("{0}")]
    IllegalTransition(Transition),

    /// The adjustment is not a whole number of minutes.
    #[error("invalid number of minutes: {0:?}")]
    InvalidValue(String),
}

/// Validates `command` against the current state and builds the single event
/// it authorizes. Returns `Ok(None)` for read-only commands.
///
/// Check events are stamped with `now`, truncated to whole seconds.
pub fn authorize(
    command: &Command,
    checked_in: bool,
    now: DateTime<Utc>,
) -> Result<Option<Event>, CommandError> {
    let at = now.trunc_subsecs(0);
    let event = match command {
        Command::Status => return Ok(None),
        Command::CheckIn { .. } if checked_in => {
            return Err(CommandError::IllegalTransition(Transition::AlreadyCheckedIn));
        }
        Command::CheckOut { .. } if !checked_in => {
            return Err(CommandError::IllegalTransition(Transition::AlreadyCheckedOut));
        }
        Command::Add { .. } | Command::Sub { .. } if checked_in => {
            return Err(CommandError::IllegalTransition(
                Transition::AdjustWhileCheckedIn,
            ));
        }
        Command::CheckIn { comment } => Event::CheckIn {
            at,
            comment: normalize_comment(comment.as_deref()),
        },
        Command::CheckOut { comment } => Event::CheckOut {
            at,
            comment: normalize_comment(comment.as_deref()),
        },
        Command::Add { minutes } => Event::Adjust {
            minutes: parse_minutes(minutes)?,
        },
        Command::Sub { minutes } => {
            let minutes = parse_minutes(minutes)?
                .checked_neg()
                .ok_or_else(|| CommandError::InvalidValue(minutes.clone()))?;
            Event::Adjust { minutes }
        }
    };
    Ok(Some(event))
}

/// Parses a signed whole number of minutes that fits in a duration.
pub fn parse_minutes(raw: &str) -> Result<i64, CommandError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|m| Duration::try_minutes(*m).is_some())
        .ok_or_else(|| CommandError::InvalidValue(raw.to_string()))
}

/// Collapses whitespace so a comment always fits on one log line.
fn normalize_comment(comment: Option<&str>) -> Option<String> {
    let joined = comment?.split_whitespace().collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}
