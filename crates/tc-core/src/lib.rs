//! Core domain logic for the timecard.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: check-ins, check-outs and manual adjustments
//! - Accounting: replaying the log into worked time for a window
//! - Validation: deciding which commands are legal in the current state

mod accountant;
pub mod event;
mod validator;

pub use accountant::{Tally, Window, compute, status};
pub use event::{Event, Op, TIMESTAMP_FORMAT, UnknownOp, format_timestamp, parse_timestamp};
pub use validator::{Command, CommandError, Transition, authorize, parse_minutes};
