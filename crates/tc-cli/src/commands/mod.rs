//! CLI subcommand implementations.

pub mod record;
pub mod report;
pub mod status;
