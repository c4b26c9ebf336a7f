//! Catalog integrity checks
//!
//! This module provides:
//! - Circular dependency detection (three-color DFS)
//! - Catalog-wide validation: dangling references, cycles, self
//!   references, dependency/conflict overlap, complexity warnings
//!
//! Meant to run at catalog-load or CI time. Live resolution tolerates the
//! defects reported here (see [`super::sort`]).

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{Catalog, Tool};

/// More direct dependencies than this produces a warning
pub const DEPENDENCY_WARNING_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub tool: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub tool: String,
    pub warning: String,
}

/// Outcome of [`validate_configuration`]
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    fn error(&mut self, tool: &Tool, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            tool: tool.id.clone(),
            error: error.into(),
        });
    }

    fn warning(&mut self, tool: &Tool, warning: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            tool: tool.id.clone(),
            warning: warning.into(),
        });
    }

    /// Errors reported for one tool
    pub fn errors_for(&self, tool_id: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.tool == tool_id).collect()
    }
}

/// Find a dependency cycle reachable from `tool`.
///
/// Three-color marking: a node is GRAY while it is on the current path and
/// BLACK once all its dependencies are done. Reaching a GRAY node is a back
/// edge. Returns the cycle as a chain of ids ending where it started.
pub fn find_cycle(catalog: &Catalog, tool: &Tool) -> Option<Vec<String>> {
    let mut black: HashSet<&str> = HashSet::new();
    // Path of GRAY nodes, with the index of the next dependency to visit
    let mut path: Vec<(&Tool, usize)> = vec![(tool, 0)];

    while let Some(frame) = path.last_mut() {
        let current = frame.0;
        let Some(dep_id) = current.dependencies.get(frame.1) else {
            black.insert(current.id.as_str());
            path.pop();
            continue;
        };
        frame.1 += 1;

        let Some(dep) = catalog.get(dep_id) else {
            continue;
        };
        if let Some(start) = path.iter().position(|(t, _)| t.id == dep.id) {
            let mut chain: Vec<String> = path[start..].iter().map(|(t, _)| t.id.clone()).collect();
            chain.push(dep.id.clone());
            return Some(chain);
        }
        if !black.contains(dep.id.as_str()) {
            path.push((dep, 0));
        }
    }

    None
}

/// True when a dependency cycle is reachable from `tool`
pub fn has_circular_dependency(catalog: &Catalog, tool: &Tool) -> bool {
    find_cycle(catalog, tool).is_some()
}

/// Validate the whole catalog.
pub fn validate_configuration(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    for tool in catalog.tools() {
        for dep_id in &tool.dependencies {
            if !catalog.contains(dep_id) {
                report.error(tool, format!("Missing dependency: {dep_id}"));
            }
        }

        if let Some(chain) = find_cycle(catalog, tool) {
            report.error(
                tool,
                format!("Circular dependency detected: {}", chain.join(" -> ")),
            );
        }

        if tool.depends_on(&tool.id) {
            report.error(tool, "Tool depends on itself");
        }

        if tool.conflicts_with(&tool.id) {
            report.error(tool, "Tool conflicts with itself");
        }

        let overlap: Vec<&str> = tool
            .dependencies
            .iter()
            .filter(|d| tool.conflicts_with(d))
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            report.error(
                tool,
                format!("Tool depends on conflicting tools: {}", overlap.join(", ")),
            );
        }

        if tool.dependencies.len() > DEPENDENCY_WARNING_THRESHOLD {
            report.warning(
                tool,
                format!("Tool has {} dependencies", tool.dependencies.len()),
            );
        }

        for other in &tool.conflicts {
            if other != &tool.id && !catalog.contains(other) {
                report.warning(tool, format!("Conflict refers to unknown tool: {other}"));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_node_cycle() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a").with_dependencies(&["b"]),
            Tool::new("b", "B", "b").with_dependencies(&["a"]),
        ])
        .unwrap();
        let a = catalog.get("a").unwrap();

        assert!(has_circular_dependency(&catalog, a));
        assert_eq!(
            find_cycle(&catalog, a),
            Some(vec!["a".to_string(), "b".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn test_cycle_not_through_start() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("root", "Root", "root").with_dependencies(&["x"]),
            Tool::new("x", "X", "x").with_dependencies(&["y"]),
            Tool::new("y", "Y", "y").with_dependencies(&["x"]),
        ])
        .unwrap();
        let root = catalog.get("root").unwrap();

        assert_eq!(
            find_cycle(&catalog, root),
            Some(vec!["x".to_string(), "y".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("base", "Base", "base"),
            Tool::new("l", "L", "l").with_dependencies(&["base"]),
            Tool::new("r", "R", "r").with_dependencies(&["base"]),
            Tool::new("top", "Top", "top").with_dependencies(&["l", "r"]),
        ])
        .unwrap();
        let top = catalog.get("top").unwrap();

        assert!(!has_circular_dependency(&catalog, top));
    }

    #[test]
    fn test_validate_reports_cycle_for_both_tools() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a").with_dependencies(&["b"]),
            Tool::new("b", "B", "b").with_dependencies(&["a"]),
        ])
        .unwrap();

        let report = validate_configuration(&catalog);
        assert!(!report.valid);
        for id in ["a", "b"] {
            let errors = report.errors_for(id);
            assert_eq!(errors.len(), 1, "expected one error for {id}");
            assert!(errors[0].error.starts_with("Circular dependency detected"));
        }
    }

    #[test]
    fn test_validate_missing_dependency() {
        let catalog =
            Catalog::from_tools(vec![Tool::new("a", "A", "a").with_dependencies(&["ghost"])])
                .unwrap();

        let report = validate_configuration(&catalog);
        assert!(!report.valid);
        assert_eq!(report.errors[0].error, "Missing dependency: ghost");
    }

    #[test]
    fn test_validate_self_references() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a")
                .with_dependencies(&["a"])
                .with_conflicts(&["a"]),
        ])
        .unwrap();

        let report = validate_configuration(&catalog);
        let messages: Vec<&str> = report.errors.iter().map(|e| e.error.as_str()).collect();
        assert!(messages.contains(&"Tool depends on itself"));
        assert!(messages.contains(&"Tool conflicts with itself"));
        assert!(messages.iter().any(|m| m.starts_with("Circular dependency")));
    }

    #[test]
    fn test_validate_dependency_conflict_overlap() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a")
                .with_dependencies(&["b", "c"])
                .with_conflicts(&["c"]),
            Tool::new("b", "B", "b"),
            Tool::new("c", "C", "c"),
        ])
        .unwrap();

        let report = validate_configuration(&catalog);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].error, "Tool depends on conflicting tools: c");
    }

    #[test]
    fn test_validate_many_dependencies_is_only_a_warning() {
        let mut tools: Vec<Tool> = (0..6)
            .map(|i| Tool::new(format!("d{i}"), format!("D{i}"), format!("d{i}")))
            .collect();
        tools.push(Tool::new("big", "Big", "big").with_dependencies(&[
            "d0", "d1", "d2", "d3", "d4", "d5",
        ]));
        let catalog = Catalog::from_tools(tools).unwrap();

        let report = validate_configuration(&catalog);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].tool, "big");
        assert_eq!(report.warnings[0].warning, "Tool has 6 dependencies");
    }

    #[test]
    fn test_validate_unknown_conflict_is_a_warning() {
        let catalog =
            Catalog::from_tools(vec![Tool::new("a", "A", "a").with_conflicts(&["ghost"])])
                .unwrap();

        let report = validate_configuration(&catalog);
        assert!(report.valid);
        assert_eq!(report.warnings[0].warning, "Conflict refers to unknown tool: ghost");
    }

    #[test]
    fn test_validate_clean_catalog() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a"),
            Tool::new("b", "B", "b").with_dependencies(&["a"]),
        ])
        .unwrap();

        let report = validate_configuration(&catalog);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }
}
