//! CLI subcommand implementations.

pub mod replay;
pub mod run;
pub mod status;
pub mod util;
