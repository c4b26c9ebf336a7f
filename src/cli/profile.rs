use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Arguments for the profile command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Save a selection:\n    devsetup profile save \"Web Dev\" git node yarn\n\n\
                  List saved profiles:\n    devsetup profile list\n\n\
                  Replace a profile's tools:\n    devsetup profile update web-dev --tool git --tool node\n\n\
                  Share a profile:\n    devsetup profile export web-dev web-dev.json\n    \
                  devsetup profile import web-dev.json")]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// List saved profiles, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Save a selection under a name
    Save {
        /// Profile name
        name: String,

        /// Tool ids
        #[arg(required = true)]
        tools: Vec<String>,

        /// Free-form description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Change a saved profile's name, description or tools
    Update {
        /// Profile id
        id: String,

        /// New name (the id stays the same)
        #[arg(long)]
        name: Option<String>,

        /// New description; an empty string clears it
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Replacement tool list (repeatable)
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<String>,
    },

    /// Save a copy of a profile under a new name
    Duplicate {
        /// Profile id
        id: String,

        /// Name of the copy (defaults to "<name> (Copy)")
        name: Option<String>,
    },

    /// Find profiles by name or description
    Search {
        /// Text to look for, ignoring case
        term: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved profile
    Delete {
        /// Profile id
        id: String,
    },

    /// Write a profile to a file
    Export {
        /// Profile id
        id: String,

        /// Destination file
        path: PathBuf,
    },

    /// Import a profile from a file
    Import {
        /// Source file
        path: PathBuf,
    },
}
