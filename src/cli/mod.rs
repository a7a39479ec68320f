//! CLI library modules for the retrofit binary.
//!
//! Argument parsing and command bodies live here so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod output;
pub mod parser;

pub use parser::{Cli, Commands};
