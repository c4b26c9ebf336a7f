//! Dependency and conflict resolution for tool selections
//!
//! This module handles:
//! - Conflict detection among selected tools ([`conflicts`])
//! - Dependency-first install ordering ([`sort`])
//! - Cycle detection and catalog validation ([`validation`])
//! - Derived graph views: closures, reverse dependencies, suggestions ([`graph`])
//!
//! Everything here is pure: no I/O, no privileged commands. A [`Resolver`]
//! borrows an explicit catalog handle, so several catalogs can coexist.

pub mod conflicts;
pub mod graph;
pub mod sort;
pub mod validation;

pub use conflicts::Conflict;
pub use graph::DependencyGraph;
pub use validation::ValidationReport;

use crate::catalog::{Catalog, Tool};
use crate::error::{Result, unknown_tool};

/// Outcome of [`Resolver::resolve`]
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Tools in install order; empty whenever `conflicts` is not
    pub install_order: Vec<&'a Tool>,
    pub conflicts: Vec<Conflict>,
}

impl<'a> Resolution<'a> {
    pub fn is_blocked(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn install_order_ids(&self) -> Vec<&'a str> {
        self.install_order.iter().map(|&t| t.id.as_str()).collect()
    }
}

/// Resolver over one catalog
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Look up selected ids, failing on the first unknown id.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&'a Tool>> {
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.catalog.get(id).ok_or_else(|| unknown_tool(id))
            })
            .collect()
    }

    /// Resolve a selection into an install order.
    ///
    /// Conflicts short-circuit: when any are found no order is computed.
    pub fn resolve(&self, selected: &[&'a Tool]) -> Resolution<'a> {
        let conflicts = conflicts::detect_conflicts(selected);
        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "selection has conflicts");
            return Resolution {
                install_order: Vec::new(),
                conflicts,
            };
        }

        let install_order = sort::install_order(self.catalog, selected);
        tracing::debug!(
            order = ?install_order.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            "resolved install order"
        );
        Resolution {
            install_order,
            conflicts,
        }
    }

    pub fn all_dependencies(&self, tool: &Tool) -> Vec<&'a Tool> {
        graph::all_dependencies(self.catalog, tool)
    }

    pub fn has_circular_dependency(&self, tool: &Tool) -> bool {
        validation::has_circular_dependency(self.catalog, tool)
    }

    pub fn reverse_dependencies(&self, tool_id: &str) -> Vec<&'a Tool> {
        graph::reverse_dependencies(self.catalog, tool_id)
    }

    pub fn validate(&self) -> ValidationReport {
        validation::validate_configuration(self.catalog)
    }

    pub fn dependency_graph(tools: &[&Tool]) -> DependencyGraph {
        graph::build_dependency_graph(tools)
    }

    pub fn suggest_additional_tools(&self, selected: &[&Tool]) -> Vec<&'a Tool> {
        graph::suggest_additional_tools(self.catalog, selected)
    }
}
