//! CLI subcommand implementations.

pub mod list;
pub mod status;
pub mod sync;
