//! Installed state of catalog tools

use serde::Serialize;

use crate::backend::PackageBackend;
use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatus {
    pub id: String,
    pub name: String,
    pub category: String,
    pub packages: Vec<String>,
    pub installed: bool,
}

/// Every catalog tool, in catalog order, with its installed state
pub fn tool_statuses(catalog: &Catalog, backend: &dyn PackageBackend) -> Vec<ToolStatus> {
    catalog
        .categories()
        .iter()
        .flat_map(|category| {
            category.tools.iter().map(move |tool| {
                let packages = backend.effective_packages(&tool.package);
                ToolStatus {
                    id: tool.id.clone(),
                    name: tool.name.clone(),
                    category: category.name.clone(),
                    installed: backend.is_installed(&packages),
                    packages,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::catalog::Tool;

    #[test]
    fn test_tool_statuses() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("git", "Git", "git"),
            Tool::new("python", "Python", "python3 python3-pip"),
        ])
        .unwrap();
        // Only one of python's packages is present
        let backend = FakeBackend::with_installed(&["git", "python3"]);

        let statuses = tool_statuses(&catalog, &backend);
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].installed);
        assert!(!statuses[1].installed);
        assert_eq!(statuses[1].packages, vec!["python3", "python3-pip"]);
        assert_eq!(statuses[0].category, "All");
    }
}
