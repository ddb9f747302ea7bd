//! Pieces of the `mibwalk` command-line tool.
//!
//! Enabled by the `cli` feature (on by default).

pub mod args;
pub mod output;
pub mod repl;
