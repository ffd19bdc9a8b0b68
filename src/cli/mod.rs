//! CLI module for the resource-set planner.
//!
//! This module provides the command-line interface for inspecting the
//! resources planned for a Temporal cluster.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
