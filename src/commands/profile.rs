//! Profile command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::{print_json, profile_store};
use crate::cli::{ProfileArgs, ProfileSubcommand};
use crate::error::Result;
use crate::profiles::{Profile, ProfileUpdate};

/// Run profile command
pub fn run(globals: &GlobalArgs, args: ProfileArgs) -> Result<()> {
    let store = profile_store(globals)?;

    match args.command {
        ProfileSubcommand::List { json } => {
            let profiles = store.list()?;
            if json {
                return print_json(&profiles);
            }
            if profiles.is_empty() {
                println!("No saved profiles.");
            }
            print_profiles(&profiles);
        }
        ProfileSubcommand::Search { term, json } => {
            let profiles = store.search(&term)?;
            if json {
                return print_json(&profiles);
            }
            if profiles.is_empty() {
                println!("No profiles match '{term}'.");
            }
            print_profiles(&profiles);
        }
        ProfileSubcommand::Save {
            name,
            tools,
            description,
        } => {
            let profile = store.save(&name, description, tools)?;
            println!(
                "{} profile '{}' ({} tools)",
                Style::new().green().bold().apply_to("Saved"),
                profile.id,
                profile.tools.len()
            );
        }
        ProfileSubcommand::Update {
            id,
            name,
            description,
            tools,
        } => {
            let changes = ProfileUpdate {
                name,
                description,
                tools: (!tools.is_empty()).then_some(tools),
            };
            let profile = store.update(&id, changes)?;
            println!(
                "{} profile '{}' ({} tools)",
                Style::new().green().bold().apply_to("Updated"),
                profile.id,
                profile.tools.len()
            );
        }
        ProfileSubcommand::Duplicate { id, name } => {
            let profile = store.duplicate(&id, name.as_deref())?;
            println!(
                "{} profile '{id}' as '{}'",
                Style::new().green().bold().apply_to("Copied"),
                profile.id
            );
        }
        ProfileSubcommand::Delete { id } => {
            store.delete(&id)?;
            println!("{} profile '{id}'", Style::new().green().bold().apply_to("Deleted"));
        }
        ProfileSubcommand::Export { id, path } => {
            store.export(&id, &path)?;
            println!(
                "{} profile '{id}' to {}",
                Style::new().green().bold().apply_to("Exported"),
                path.display()
            );
        }
        ProfileSubcommand::Import { path } => {
            let profile = store.import(&path)?;
            println!(
                "{} profile '{}'",
                Style::new().green().bold().apply_to("Imported"),
                profile.id
            );
        }
    }
    Ok(())
}

fn print_profiles(profiles: &[Profile]) {
    for p in profiles {
        println!(
            "  {:<24} {:<30} {}",
            Style::new().cyan().apply_to(&p.id),
            p.name,
            Style::new().dim().apply_to(p.tools.join(", "))
        );
    }
}
