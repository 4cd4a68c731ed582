//! # CLI Command Implementations
//!
//! Each subcommand of the `branch-publish` tool lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `branch_publish` library to do the work.

pub mod publish;
