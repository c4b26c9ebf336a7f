//! Command implementations for the devsetup CLI

pub mod completions;
pub mod doctor;
pub mod extras;
pub mod graph;
pub mod helpers;
pub mod install;
pub mod list;
pub mod plan;
pub mod profile;
pub mod service;
pub mod show;
pub mod sites;
pub mod uninstall;
pub mod validate;
pub mod version;

use std::path::PathBuf;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
}
