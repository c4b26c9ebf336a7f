//! Pairwise conflict detection over a selection
//!
//! Conflicts are declared per tool but take effect in both directions:
//! a conflict declared only on `a` pointing at `b` is found whether `a`
//! or `b` comes first in the selection. A pair declared from both sides
//! yields a single record.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::Tool;

/// A declared incompatibility between two selected tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Tool that declares the conflict
    pub tool1: String,
    pub tool1_name: String,
    /// Tool named in `tool1`'s conflict list
    pub tool2: String,
    pub tool2_name: String,
    pub reason: String,
}

impl Conflict {
    fn declared_by(declaring: &Tool, other: &Tool) -> Self {
        Self {
            tool1: declaring.id.clone(),
            tool1_name: declaring.name.clone(),
            tool2: other.id.clone(),
            tool2_name: other.name.clone(),
            reason: format!("{} conflicts with {}", declaring.name, other.name),
        }
    }

    /// Canonical unordered pair key
    fn pair_key(&self) -> (String, String) {
        if self.tool1 <= self.tool2 {
            (self.tool1.clone(), self.tool2.clone())
        } else {
            (self.tool2.clone(), self.tool1.clone())
        }
    }
}

/// Detect conflicts among the selected tools.
///
/// Pairs are visited as `i < j` over the selection, checking `i`'s
/// declarations before `j`'s, so the output order is stable.
pub fn detect_conflicts(selected: &[&Tool]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut seen = HashSet::new();

    let mut record = |conflict: Conflict| {
        if seen.insert(conflict.pair_key()) {
            conflicts.push(conflict);
        }
    };

    for (i, first) in selected.iter().enumerate() {
        for second in &selected[i + 1..] {
            if first.conflicts_with(&second.id) {
                record(Conflict::declared_by(first, second));
            }
            if second.conflicts_with(&first.id) {
                record(Conflict::declared_by(second, first));
            }
        }
    }

    conflicts
}

/// One-line human summary of a conflict list
pub fn summarize(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.reason.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
