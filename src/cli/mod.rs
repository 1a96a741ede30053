//! Command-line interface.
//!
//! Argument definitions live in [`args`]; each subcommand is implemented in
//! [`commands`] behind the [`Command`](commands::Command) trait and routed
//! by the [`CommandDispatcher`](commands::CommandDispatcher).

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
pub use commands::{Command, CommandDispatcher, CommandResult};
