//! The `list` command.

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::registry;
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// Prints the template registry.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let templates = registry::all();

        if self.args.json {
            let json =
                serde_json::to_string_pretty(templates).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = console.theme();
        console.message(&theme.highlight.apply_to("Templates:").to_string());
        for template in templates {
            let kit = if template.has_starter_kit {
                " (starter kit)"
            } else {
                ""
            };
            console.message(&format!(
                "  ◆ {} {}{}",
                theme.highlight.apply_to(template.output_folder),
                theme.dim.apply_to(template.entry_file),
                theme.dim.apply_to(kit),
            ));
        }

        Ok(CommandResult::success())
    }
}
