//! Derived views over the dependency relation
//!
//! - transitive closure of one tool's dependencies
//! - reverse dependencies (impact analysis)
//! - completion hints for a selection
//! - a renderable node/edge projection of the catalog (JSON or DOT)

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::{Catalog, Tool};

/// All dependencies of `tool`, transitively, excluding the tool itself.
///
/// Discovery order is depth-first pre-order: a dependency is listed when
/// first reached, before its own dependencies. Each tool appears once.
pub fn all_dependencies<'a>(catalog: &'a Catalog, tool: &Tool) -> Vec<&'a Tool> {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(tool.id.as_str());
    let mut found: Vec<&'a Tool> = Vec::new();

    // Frames iterate dependency id lists by index
    let mut stack: Vec<(&[String], usize)> = vec![(tool.dependencies.as_slice(), 0)];
    while let Some(frame) = stack.last_mut() {
        let deps = frame.0;
        let Some(dep_id) = deps.get(frame.1) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if let Some(dep) = catalog.get(dep_id) {
            if seen.insert(dep.id.as_str()) {
                found.push(dep);
                stack.push((dep.dependencies.as_slice(), 0));
            }
        }
    }

    found
}

/// Tools that list `tool_id` among their direct dependencies
pub fn reverse_dependencies<'a>(catalog: &'a Catalog, tool_id: &str) -> Vec<&'a Tool> {
    catalog
        .tools()
        .into_iter()
        .filter(|t| t.depends_on(tool_id))
        .collect()
}

/// Direct dependencies of any selected tool that are not themselves selected,
/// in catalog order.
pub fn suggest_additional_tools<'a>(catalog: &'a Catalog, selected: &[&Tool]) -> Vec<&'a Tool> {
    let selected_ids: HashSet<&str> = selected.iter().map(|t| t.id.as_str()).collect();
    let suggestions: HashSet<&str> = selected
        .iter()
        .flat_map(|t| t.dependencies.iter().map(String::as_str))
        .filter(|id| !selected_ids.contains(id))
        .collect();

    catalog
        .tools()
        .into_iter()
        .filter(|t| suggestions.contains(t.id.as_str()))
        .collect()
}

/// One node per tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub dependency_count: usize,
    pub conflict_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Dependency,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Node/edge projection of a tool set
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build the graph projection; one edge per declared dependency and conflict.
pub fn build_dependency_graph(tools: &[&Tool]) -> DependencyGraph {
    let mut graph = DependencyGraph::default();

    for tool in tools {
        graph.nodes.push(GraphNode {
            id: tool.id.clone(),
            name: tool.name.clone(),
            dependency_count: tool.dependencies.len(),
            conflict_count: tool.conflicts.len(),
        });

        for dep in &tool.dependencies {
            graph.edges.push(GraphEdge {
                from: tool.id.clone(),
                to: dep.clone(),
                kind: EdgeKind::Dependency,
            });
        }
        for other in &tool.conflicts {
            graph.edges.push(GraphEdge {
                from: tool.id.clone(),
                to: other.clone(),
                kind: EdgeKind::Conflict,
            });
        }
    }

    graph
}

impl DependencyGraph {
    /// Render as Graphviz DOT. Conflict edges are dashed red.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph tools {\n    rankdir=LR;\n");
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "    \"{}\" [label=\"{}\"];",
                escape_dot(&node.id),
                escape_dot(&node.name)
            );
        }
        for edge in &self.edges {
            let style = match edge.kind {
                EdgeKind::Dependency => "",
                EdgeKind::Conflict => " [style=dashed, color=red, dir=none]",
            };
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\"{};",
                escape_dot(&edge.from),
                escape_dot(&edge.to),
                style
            );
        }
        out.push_str("}\n");
        out
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::from_tools(vec![
            Tool::new("curl", "curl", "curl"),
            Tool::new("git", "Git", "git").with_dependencies(&["curl"]),
            Tool::new("node", "Node.js", "nodejs").with_dependencies(&["curl"]),
            Tool::new("yarn", "Yarn", "yarn").with_dependencies(&["node", "git"]),
            Tool::new("nginx", "Nginx", "nginx").with_conflicts(&["apache"]),
            Tool::new("apache", "Apache", "apache2"),
        ])
        .unwrap()
    }

    fn ids<'a>(tools: &[&'a Tool]) -> Vec<&'a str> {
        tools.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_all_dependencies_discovery_order() {
        let catalog = sample_catalog();
        let yarn = catalog.get("yarn").unwrap();

        assert_eq!(ids(&all_dependencies(&catalog, yarn)), vec!["node", "curl", "git"]);
    }

    #[test]
    fn test_all_dependencies_excludes_self_in_cycle() {
        let catalog = Catalog::from_tools(vec![
            Tool::new("a", "A", "a").with_dependencies(&["b"]),
            Tool::new("b", "B", "b").with_dependencies(&["a"]),
        ])
        .unwrap();
        let a = catalog.get("a").unwrap();

        assert_eq!(ids(&all_dependencies(&catalog, a)), vec!["b"]);
    }

    #[test]
    fn test_all_dependencies_empty() {
        let catalog = sample_catalog();
        let curl = catalog.get("curl").unwrap();
        assert!(all_dependencies(&catalog, curl).is_empty());
    }

    #[test]
    fn test_reverse_dependencies() {
        let catalog = sample_catalog();
        assert_eq!(ids(&reverse_dependencies(&catalog, "curl")), vec!["git", "node"]);
        assert!(reverse_dependencies(&catalog, "yarn").is_empty());
        assert!(reverse_dependencies(&catalog, "missing").is_empty());
    }

    #[test]
    fn test_suggest_additional_tools() {
        let catalog = sample_catalog();
        let yarn = catalog.get("yarn").unwrap();
        let git = catalog.get("git").unwrap();

        // git is selected, node is not; curl is only a transitive dependency
        assert_eq!(ids(&suggest_additional_tools(&catalog, &[yarn, git])), vec!["curl", "node"]);
    }

    #[test]
    fn test_build_dependency_graph() {
        let catalog = sample_catalog();
        let graph = build_dependency_graph(&catalog.tools());

        assert_eq!(graph.nodes.len(), 6);
        let yarn = graph.nodes.iter().find(|n| n.id == "yarn").unwrap();
        assert_eq!(yarn.dependency_count, 2);
        assert_eq!(yarn.conflict_count, 0);

        let deps = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Dependency)
            .count();
        let conflicts: Vec<&GraphEdge> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Conflict)
            .collect();
        assert_eq!(deps, 4);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].from, "nginx");
        assert_eq!(conflicts[0].to, "apache");
    }

    #[test]
    fn test_graph_json_shape() {
        let catalog = sample_catalog();
        let graph = build_dependency_graph(&catalog.tools());
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["nodes"][1]["dependencyCount"], 1);
        assert_eq!(json["edges"][0]["type"], "dependency");
    }

    #[test]
    fn test_graph_to_dot() {
        let catalog = sample_catalog();
        let dot = build_dependency_graph(&catalog.tools()).to_dot();

        assert!(dot.starts_with("digraph tools {"));
        assert!(dot.contains("\"git\" -> \"curl\";"));
        assert!(dot.contains("\"nginx\" -> \"apache\" [style=dashed"));
    }
}
