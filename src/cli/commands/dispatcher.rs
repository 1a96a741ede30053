//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, TemplateArgs};
use crate::error::Result;
use crate::pipeline::Stage;
use crate::ui::Console;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, printing through `console`.
    fn execute(&self, console: &Console) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root,
            config_path,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, console: &Console) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Build(args)) => self.build(args).execute(console),
            Some(Commands::Clean(args)) => self.stage(Stage::Clean, args).execute(console),
            Some(Commands::Bundle(args)) => self.stage(Stage::Build, args).execute(console),
            Some(Commands::Convert(args)) => self.stage(Stage::Convert, args).execute(console),
            Some(Commands::Tidy(args)) => self.stage(Stage::Tidy, args).execute(console),
            Some(Commands::Register(args)) => self.stage(Stage::Register, args).execute(console),
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(args.clone()).execute(console)
            }
            Some(Commands::Doctor) => {
                super::doctor::DoctorCommand::new(&self.project_root, self.config_path.clone())
                    .execute(console)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(console)
            }
            // Default to a full build, same as the aggregate command
            None => self.build(&TemplateArgs::default()).execute(console),
        }
    }

    fn build(&self, args: &TemplateArgs) -> super::build::BuildCommand {
        super::build::BuildCommand::new(
            &self.project_root,
            self.config_path.clone(),
            args.clone(),
        )
    }

    fn stage(&self, stage: Stage, args: &TemplateArgs) -> super::stage::StageCommand {
        super::stage::StageCommand::new(
            &self.project_root,
            self.config_path.clone(),
            stage,
            args.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"), None);
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }
}
