//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// kitforge - Build pipeline for server-framework codegen starter kits.
#[derive(Debug, Parser)]
#[command(name = "kitforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default kitforge.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline for all templates (default if no command given)
    Build(TemplateArgs),

    /// Remove a template's output folder
    Clean(TemplateArgs),

    /// Compile a template's entry point into its bundle
    Bundle(TemplateArgs),

    /// Rewrite a built bundle for dual-environment execution
    Convert(TemplateArgs),

    /// Remove auxiliary build artifacts from an output folder
    Tidy(TemplateArgs),

    /// Upsert a template's entry into the shared manifest
    Register(TemplateArgs),

    /// List registered templates
    List(ListArgs),

    /// Check that a build would work: bundler, templates, manifest
    Doctor,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for commands that target one or all templates.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TemplateArgs {
    /// Template output folder (all templates when omitted)
    pub template: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_accepts_optional_template() {
        let cli = Cli::parse_from(["kitforge", "build", "go-serve-mux"]);
        match cli.command {
            Some(Commands::Build(args)) => {
                assert_eq!(args.template.as_deref(), Some("go-serve-mux"));
            }
            other => panic!("expected build command, got {:?}", other),
        }
    }

    #[test]
    fn no_command_defaults_to_none() {
        let cli = Cli::parse_from(["kitforge"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_parse_anywhere() {
        let cli = Cli::parse_from(["kitforge", "list", "--quiet", "--debug"]);
        assert!(cli.quiet);
        assert!(cli.debug);
    }
}
