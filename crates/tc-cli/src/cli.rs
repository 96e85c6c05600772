//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tc_core::Command;

/// Personal timecard.
///
/// Records check-ins, check-outs and manual adjustments to a local log and
/// reports worked hours for today, this week and last week.
#[derive(Debug, Parser)]
#[command(name = "timecard", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check in, starting a work session.
    In {
        /// Free-text comment stored with the event.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        comment: Vec<String>,
    },

    /// Check out, ending the current work session.
    Out {
        /// Free-text comment stored with the event.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        comment: Vec<String>,
    },

    /// Add minutes to the last session (only while checked out).
    Add {
        /// Number of minutes.
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },

    /// Subtract minutes from the last session (only while checked out).
    Sub {
        /// Number of minutes.
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },

    /// Show current status and worked hours.
    St {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// The domain command this invocation requests.
    pub fn to_command(&self) -> Command {
        match self {
            Self::In { comment } => Command::CheckIn {
                comment: join_comment(comment),
            },
            Self::Out { comment } => Command::CheckOut {
                comment: join_comment(comment),
            },
            Self::Add { minutes } => Command::Add {
                minutes: minutes.clone(),
            },
            Self::Sub { minutes } => Command::Sub {
                minutes: minutes.clone(),
            },
            Self::St { .. } => Command::Status,
        }
    }
}

fn join_comment(words: &[String]) -> Option<String> {
    (!words.is_empty()).then(|| words.join(" "))
}
