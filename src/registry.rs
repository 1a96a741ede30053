//! Template registry.
//!
//! The registry is an ordered, immutable static table of every codegen
//! template the pipeline builds. Each row names the entry script, the output
//! folder under the output root, and whether the framework ships a starter
//! kit. The output folder doubles as the manifest entry name, so it must be
//! unique across the table; a duplicate is a configuration defect caught by
//! `kitforge doctor`, not something the registry polices at runtime.

use serde::Serialize;

/// Identity of one buildable codegen template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    /// Entry script file name inside the templates directory.
    pub entry_file: &'static str,

    /// Output folder under the output root; also the manifest entry name.
    pub output_folder: &'static str,

    /// Whether this framework ships a starter-kit variant.
    pub has_starter_kit: bool,
}

const TEMPLATES: &[TemplateDefinition] = &[
    TemplateDefinition {
        entry_file: "goServeMux.codegen.ts",
        output_folder: "go-serve-mux",
        has_starter_kit: false,
    },
    TemplateDefinition {
        entry_file: "http4kBasic.codegen.ts",
        output_folder: "kotlin-http4k",
        has_starter_kit: false,
    },
    TemplateDefinition {
        entry_file: "javascriptExpress.codegen.ts",
        output_folder: "node-express-jsdoc",
        has_starter_kit: false,
    },
    TemplateDefinition {
        entry_file: "kotlinKtor.codegen.ts",
        output_folder: "kotlin-ktor",
        has_starter_kit: false,
    },
    TemplateDefinition {
        entry_file: "pythonFastAPI.codegen.ts",
        output_folder: "python-fast-api",
        has_starter_kit: true,
    },
    TemplateDefinition {
        entry_file: "typescriptExpress.codegen.ts",
        output_folder: "typescript-express",
        has_starter_kit: false,
    },
];

/// All registered templates, in build order.
pub fn all() -> &'static [TemplateDefinition] {
    TEMPLATES
}

/// Look up a template by its output folder name.
pub fn find(output_folder: &str) -> Option<&'static TemplateDefinition> {
    TEMPLATES.iter().find(|t| t.output_folder == output_folder)
}
