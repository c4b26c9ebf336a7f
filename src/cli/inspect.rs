//! Arguments for the read-only commands

use clap::{Parser, ValueEnum};

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List all tools:\n    devsetup list\n\n\
                  Include installed state:\n    devsetup list --status\n\n\
                  One category, as JSON:\n    devsetup list --category databases --json")]
pub struct ListArgs {
    /// Only list tools in this category (id)
    #[arg(long)]
    pub category: Option<String>,

    /// Query the package manager for each tool's installed state
    #[arg(long)]
    pub status: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Tool id
    pub tool: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the install order for yarn:\n    devsetup plan yarn\n\n\
                  Check a selection for conflicts:\n    devsetup plan nginx apache")]
pub struct PlanArgs {
    /// Tool ids to resolve
    #[arg(required = true)]
    pub tools: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Json,
    Dot,
}

/// Arguments for the graph command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Render the catalog graph:\n    devsetup graph --format dot | dot -Tsvg > tools.svg\n\n\
                  Graph of a selection and its dependencies:\n    devsetup graph yarn")]
pub struct GraphArgs {
    /// Restrict the graph to these tools and their dependencies
    pub tools: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = GraphFormat::Json)]
    pub format: GraphFormat,
}
