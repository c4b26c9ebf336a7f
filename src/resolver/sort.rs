//! Install ordering via dependency-first depth-first traversal
//!
//! Each selected tool is visited in the order given. On first visit a tool
//! is marked, its dependencies are visited in declared order, and the tool
//! is appended once all of them are done (post-order). The result:
//!
//! - every dependency appears before its dependent
//! - a tool reachable along several paths appears once, at its first
//!   completed position
//! - unrelated tools keep the order in which they were first reached
//!
//! Dependencies missing from the catalog are skipped. The traversal uses
//! an explicit stack so deep chains cannot overflow the call stack.
//!
//! ```text
//! Catalog: a (no deps), b -> [a], c -> [b]
//! Selection: [c]
//!
//! Result: [a, b, c]
//! ```

use std::collections::HashSet;

use crate::catalog::{Catalog, Tool};

/// Compute the install order for `selected` over `catalog`.
pub fn install_order<'a>(catalog: &'a Catalog, selected: &[&'a Tool]) -> Vec<&'a Tool> {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut order = Vec::new();

    for &root in selected {
        if !visited.insert(root.id.as_str()) {
            continue;
        }

        // (tool, index of the next dependency to visit)
        let mut stack: Vec<(&'a Tool, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let tool = frame.0;
            if let Some(dep_id) = tool.dependencies.get(frame.1) {
                frame.1 += 1;
                if let Some(dep) = catalog.get(dep_id) {
                    if visited.insert(dep.id.as_str()) {
                        stack.push((dep, 0));
                    }
                } else {
                    tracing::debug!(tool = %tool.id, dependency = %dep_id, "skipping unknown dependency");
                }
            } else {
                order.push(tool);
                stack.pop();
            }
        }
    }

    order
}
