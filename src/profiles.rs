//! Saved tool selections
//!
//! One JSON file per profile, named `<id>.json`, in the profiles
//! directory. Writes go through a temp file in the same directory and are
//! renamed into place. New profiles are linked in without replacing
//! anything, so two saves of the same name always get distinct ids.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{
    Result, file_read_failed, file_write_failed, profile_invalid, profile_not_found,
};

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tools: Vec<String>,
    /// Milliseconds since the Unix epoch, strictly increasing per store
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

/// Fields to change with [`ProfileStore::update`]; `None` keeps the old value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tools: Option<Vec<String>>,
}

/// Lowercase ASCII alphanumerics, other runs collapsed to `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

fn validate(name: &str, tools: &[String]) -> Result<()> {
    if name.trim().is_empty() {
        return Err(profile_invalid("profile name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(profile_invalid(format!(
            "profile name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    if tools.is_empty() {
        return Err(profile_invalid("profile must contain at least one tool"));
    }
    if slugify(name).is_empty() {
        return Err(profile_invalid("profile name needs at least one letter or digit"));
    }
    Ok(())
}

fn non_blank(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// All profiles, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<Profile>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| file_read_failed(self.dir.display().to_string(), e.to_string()))?;

        let mut profiles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_profile(&path) {
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable profile"),
            }
        }
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(profiles)
    }

    /// Profiles whose name or description contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Result<Vec<Profile>> {
        let term = term.trim().to_lowercase();
        let mut profiles = self.list()?;
        if !term.is_empty() {
            profiles.retain(|p| {
                p.name.to_lowercase().contains(&term)
                    || p
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            });
        }
        Ok(profiles)
    }

    pub fn get(&self, id: &str) -> Result<Profile> {
        if slugify(id) != id {
            return Err(profile_not_found(id));
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(profile_not_found(id));
        }
        read_profile(&path)
    }

    /// Save a new profile. The id is the slug of `name`, suffixed when taken.
    pub fn save(
        &self,
        name: &str,
        description: Option<String>,
        tools: Vec<String>,
    ) -> Result<Profile> {
        validate(name, &tools)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| file_write_failed(self.dir.display().to_string(), e.to_string()))?;

        let base = slugify(name);
        let created_at = self.next_timestamp()?;
        let mut profile = Profile {
            id: base.clone(),
            name: name.trim().to_string(),
            description: non_blank(description),
            tools,
            created_at,
            updated_at: created_at,
        };

        let mut n = 2;
        while !self.write_new(&profile)? {
            profile.id = format!("{base}-{n}");
            n += 1;
        }
        tracing::info!(id = %profile.id, "saved profile");
        Ok(profile)
    }

    /// Change a profile in place. The id and creation time stay the same.
    pub fn update(&self, id: &str, changes: ProfileUpdate) -> Result<Profile> {
        let mut profile = self.get(id)?;
        if let Some(name) = changes.name {
            profile.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            profile.description = non_blank(Some(description));
        }
        if let Some(tools) = changes.tools {
            profile.tools = tools;
        }
        validate(&profile.name, &profile.tools)?;

        profile.updated_at = now_millis().max(profile.updated_at + 1);
        self.write(&profile)?;
        tracing::info!(id = %profile.id, "updated profile");
        Ok(profile)
    }

    /// Save a copy of `id` as a new profile, named `new_name` or "<name> (Copy)".
    pub fn duplicate(&self, id: &str, new_name: Option<&str>) -> Result<Profile> {
        let original = self.get(id)?;
        let name = new_name.map_or_else(|| format!("{} (Copy)", original.name), str::to_string);
        self.save(&name, original.description, original.tools)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(&self.get(id)?.id);
        std::fs::remove_file(&path)
            .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
    }

    /// Write a profile as pretty JSON to `dest`.
    pub fn export(&self, id: &str, dest: &Path) -> Result<()> {
        let profile = self.get(id)?;
        let json = serde_json::to_string_pretty(&profile)
            .map_err(|e| file_write_failed(dest.display().to_string(), e.to_string()))?;
        std::fs::write(dest, json)
            .map_err(|e| file_write_failed(dest.display().to_string(), e.to_string()))
    }

    /// Import a profile file as a new profile with a fresh id and timestamp.
    pub fn import(&self, src: &Path) -> Result<Profile> {
        let imported = read_profile(src)?;
        self.save(&imported.name, imported.description, imported.tools)
    }

    /// Now, or just after the newest stored profile if the clock is behind it.
    fn next_timestamp(&self) -> Result<u64> {
        let newest = self.list()?.first().map_or(0, |p| p.created_at);
        Ok(now_millis().max(newest + 1))
    }

    fn staged(&self, profile: &Profile) -> Result<NamedTempFile> {
        let path = self.path_for(&profile.id);
        let to_write_error =
            |e: &dyn std::fmt::Display| file_write_failed(path.display().to_string(), e.to_string());

        let json = serde_json::to_string_pretty(profile).map_err(|e| to_write_error(&e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| to_write_error(&e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| to_write_error(&e))?;
        Ok(tmp)
    }

    /// Create `<id>.json`; `false` when a profile with that id already exists.
    fn write_new(&self, profile: &Profile) -> Result<bool> {
        let path = self.path_for(&profile.id);
        match self.staged(profile)?.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(file_write_failed(path.display().to_string(), e.error.to_string())),
        }
    }

    /// Create or replace `<id>.json`.
    fn write(&self, profile: &Profile) -> Result<()> {
        let path = self.path_for(&profile.id);
        self.staged(profile)?
            .persist(&path)
            .map_err(|e| file_write_failed(path.display().to_string(), e.error.to_string()))?;
        Ok(())
    }
}

fn read_profile(path: &Path) -> Result<Profile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| profile_invalid(format!("{}: {e}", path.display())))
}
