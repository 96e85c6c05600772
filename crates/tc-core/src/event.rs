//! Timecard events as they are recorded in the log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of persisted check timestamps (UTC, second precision, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Formats a timestamp the way it is written to the log.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a `YYYYMMDDTHH:MM:SS` timestamp, interpreted as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).map(|dt| dt.and_utc())
}

/// A single immutable entry of the time card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start of a work session.
    CheckIn {
        at: DateTime<Utc>,
        /// Opaque free text. Never read by any computation.
        comment: Option<String>,
    },
    /// End of a work session.
    CheckOut {
        at: DateTime<Utc>,
        comment: Option<String>,
    },
    /// Manual correction in minutes, positive or negative.
    ///
    /// The adjustment is attributed to the most recent check-in seen when
    /// the log is replayed.
    Adjust { minutes: i64 },
}

impl Event {
    /// The operation code this event is persisted under.
    pub const fn op(&self) -> Op {
        match self {
            Self::CheckIn { .. } => Op::In,
            Self::CheckOut { .. } => Op::Out,
            Self::Adjust { minutes } if *minutes < 0 => Op::Sub,
            Self::Adjust { .. } => Op::Add,
        }
    }

    /// Timestamp of a check event; adjustments have none.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::CheckIn { at, .. } | Self::CheckOut { at, .. } => Some(*at),
            Self::Adjust { .. } => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::CheckIn { comment, .. } | Self::CheckOut { comment, .. } => comment.as_deref(),
            Self::Adjust { .. } => None,
        }
    }
}

/// Persisted operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    In,
    Out,
    Add,
    Sub,
}

impl Op {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Add => "add",
            Self::Sub => "sub",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Op {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "add" => Ok(Self::Add),
            "sub" => Ok(Self::Sub),
            _ => Err(UnknownOp(s.to_string())),
        }
    }
}

impl Serialize for Op {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown operation codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOp(String);

impl fmt::Display for UnknownOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation: {:?}", self.0)
    }
}

impl std::error::Error for UnknownOp {}
