//! Tool catalog data model
//!
//! The catalog is the read-only set of installable tools, grouped into
//! categories. It is loaded once per session (see [`loader`]) and passed
//! explicitly to the resolver and the install operations.

pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, catalog_invalid, duplicate_tool_id, invalid_package_name};

pub use loader::load_catalog;

/// Catalog document (`tools.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub version: String,
    pub categories: Vec<Category>,
}

/// A named group of tools. Grouping only, no effect on resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tools: Vec<Tool>,
}

/// A catalog entry: one installable unit backed by one or more OS packages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub package: PackageSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_command: Option<String>,

    /// Tool ids installed before this one, in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Tool ids that cannot be installed alongside this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,

    /// Shell command run once after a successful package install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_install: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<Extra>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_management: Option<ConfigManagement>,
}

/// Optional sub-module of a tool, installable and removable on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    pub id: String,
    pub name: String,
    pub package: PackageSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Site-style configuration files owned by a service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigManagement {
    #[serde(rename = "type")]
    pub kind: String,
    pub available_path: String,
    pub enabled_path: String,
    pub service_name: String,
}

/// OS package names: either a space-delimited string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageSpec {
    Single(String),
    List(Vec<String>),
}

impl PackageSpec {
    /// Individual package names, whitespace-split and without empties
    pub fn names(&self) -> Vec<String> {
        match self {
            PackageSpec::Single(s) => s.split_whitespace().map(str::to_string).collect(),
            PackageSpec::List(list) => list
                .iter()
                .flat_map(|s| s.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names().join(" "))
    }
}

impl From<&str> for PackageSpec {
    fn from(s: &str) -> Self {
        PackageSpec::Single(s.to_string())
    }
}

impl Tool {
    /// Create a tool with no dependencies, conflicts or extras
    pub fn new(id: impl Into<String>, name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            package: PackageSpec::Single(package.into()),
            description: None,
            version: None,
            size: None,
            website: None,
            check_command: None,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            post_install: None,
            extras: Vec::new(),
            config_management: None,
        }
    }

    #[must_use]
    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| (*d).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_conflicts(mut self, conflicts: &[&str]) -> Self {
        self.conflicts = conflicts.iter().map(|c| (*c).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_post_install(mut self, command: impl Into<String>) -> Self {
        self.post_install = Some(command.into());
        self
    }

    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d == id)
    }

    pub fn conflicts_with(&self, id: &str) -> bool {
        self.conflicts.iter().any(|c| c == id)
    }

    pub fn extra(&self, id: &str) -> Option<&Extra> {
        self.extras.iter().find(|e| e.id == id)
    }
}

/// Read-only lookup over all tools of a catalog document
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    categories: Vec<Category>,
    /// Tool id -> (category index, tool index)
    index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog from a parsed document, rejecting documents that
    /// violate the catalog shape (empty or duplicate ids, unsafe package names).
    pub fn from_document(doc: CatalogDocument) -> Result<Self> {
        let mut index = HashMap::new();
        for (ci, category) in doc.categories.iter().enumerate() {
            for (ti, tool) in category.tools.iter().enumerate() {
                check_tool_shape(tool)?;
                if index.insert(tool.id.clone(), (ci, ti)).is_some() {
                    return Err(duplicate_tool_id(&tool.id));
                }
            }
        }
        Ok(Self {
            version: doc.version,
            categories: doc.categories,
            index,
        })
    }

    /// Single-category catalog, mostly for tests and ad-hoc tool lists
    pub fn from_tools(tools: Vec<Tool>) -> Result<Self> {
        Self::from_document(CatalogDocument {
            version: "0".to_string(),
            categories: vec![Category {
                id: "all".to_string(),
                name: "All".to_string(),
                icon: None,
                description: None,
                tools,
            }],
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All tools flattened across categories, in document order
    pub fn tools(&self) -> Vec<&Tool> {
        self.categories.iter().flat_map(|c| c.tools.iter()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.index
            .get(id)
            .map(|&(ci, ti)| &self.categories[ci].tools[ti])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Characters accepted in OS package names; anything else could reach a shell.
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | ':' | '_' | '-'))
}

fn check_tool_shape(tool: &Tool) -> Result<()> {
    if tool.id.trim().is_empty() {
        return Err(catalog_invalid(format!(
            "tool '{}' has an empty id",
            tool.name
        )));
    }
    check_packages(&tool.id, &tool.package)?;

    let mut extra_ids = std::collections::HashSet::new();
    for extra in &tool.extras {
        if extra.id.trim().is_empty() {
            return Err(catalog_invalid(format!(
                "tool '{}' has an extra with an empty id",
                tool.id
            )));
        }
        if !extra_ids.insert(extra.id.as_str()) {
            return Err(catalog_invalid(format!(
                "tool '{}' declares extra '{}' twice",
                tool.id, extra.id
            )));
        }
        check_packages(&tool.id, &extra.package)?;
    }
    Ok(())
}

fn check_packages(tool_id: &str, spec: &PackageSpec) -> Result<()> {
    let names = spec.names();
    if names.is_empty() {
        return Err(catalog_invalid(format!(
            "tool '{tool_id}' declares no package"
        )));
    }
    if let Some(bad) = names.iter().find(|n| !is_valid_package_name(n)) {
        return Err(invalid_package_name(tool_id, bad.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DevsetupError;

    #[test]
    fn test_package_spec_splits_whitespace() {
        let spec = PackageSpec::from("python3  python3-pip");
        assert_eq!(spec.names(), vec!["python3", "python3-pip"]);
        assert_eq!(spec.to_string(), "python3 python3-pip");
    }

    #[test]
    fn test_package_spec_list() {
        let spec = PackageSpec::List(vec!["nodejs".to_string(), "npm".to_string()]);
        assert_eq!(spec.names(), vec!["nodejs", "npm"]);
    }

    #[test]
    fn test_package_spec_deserializes_both_forms() {
        let single: PackageSpec = serde_json::from_str(r#""git git-lfs""#).unwrap();
        let list: PackageSpec = serde_json::from_str(r#"["git", "git-lfs"]"#).unwrap();
        assert_eq!(single.names(), list.names());
    }

    #[test]
    fn test_catalog_lookup_and_flatten() {
        let doc = CatalogDocument {
            version: "1.0".to_string(),
            categories: vec![
                Category {
                    id: "vcs".to_string(),
                    name: "Version control".to_string(),
                    icon: None,
                    description: None,
                    tools: vec![Tool::new("git", "Git", "git")],
                },
                Category {
                    id: "web".to_string(),
                    name: "Web".to_string(),
                    icon: None,
                    description: None,
                    tools: vec![
                        Tool::new("nginx", "Nginx", "nginx"),
                        Tool::new("apache", "Apache", "apache2"),
                    ],
                },
            ],
        };
        let catalog = Catalog::from_document(doc).unwrap();

        let ids: Vec<&str> = catalog.tools().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["git", "nginx", "apache"]);
        assert_eq!(catalog.get("apache").map(|t| t.name.as_str()), Some("Apache"));
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.version(), "1.0");
    }

    #[test]
    fn test_duplicate_ids_across_categories_rejected() {
        let doc = CatalogDocument {
            version: "1.0".to_string(),
            categories: vec![
                Category {
                    id: "a".to_string(),
                    name: "A".to_string(),
                    icon: None,
                    description: None,
                    tools: vec![Tool::new("git", "Git", "git")],
                },
                Category {
                    id: "b".to_string(),
                    name: "B".to_string(),
                    icon: None,
                    description: None,
                    tools: vec![Tool::new("git", "Git again", "git")],
                },
            ],
        };
        let result = Catalog::from_document(doc);
        assert!(matches!(result, Err(DevsetupError::DuplicateToolId { .. })));
    }

    #[test]
    fn test_unsafe_package_name_rejected() {
        let result = Catalog::from_tools(vec![Tool::new("evil", "Evil", "git;reboot")]);
        assert!(matches!(
            result,
            Err(DevsetupError::InvalidPackageName { .. })
        ));
    }

    #[test]
    fn test_empty_package_rejected() {
        let result = Catalog::from_tools(vec![Tool::new("empty", "Empty", "   ")]);
        assert!(matches!(result, Err(DevsetupError::CatalogInvalid { .. })));
    }

    #[test]
    fn test_valid_package_names() {
        assert!(is_valid_package_name("g++"));
        assert!(is_valid_package_name("libssl3:amd64"));
        assert!(is_valid_package_name("python3.12-venv"));
        assert!(!is_valid_package_name("-y"));
        assert!(!is_valid_package_name("a b"));
        assert!(!is_valid_package_name("$(id)"));
    }
}
