//! Focus tracker CLI library.
//!
//! This crate provides the CLI interface and the frame loop for the focus
//! tracker.

mod cli;
pub mod commands;
mod config;
pub mod exit;
pub mod monitor;

pub use cli::{Cli, Commands};
pub use config::Config;
