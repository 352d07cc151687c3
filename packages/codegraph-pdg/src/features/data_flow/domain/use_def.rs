//! Use-def (last-use) store

use super::store::{AbstractStore, DataflowValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Node-level DATA edge: `from` was the last use of `variable` before `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataEdge {
    pub from: DataflowValue,
    pub to: DataflowValue,
    pub variable: String,
}

/// `last_use: name → occurrences` plus the edges found on this path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseDefStore {
    pub last_use: BTreeMap<String, BTreeSet<DataflowValue>>,
    pub edges: BTreeSet<DataEdge>,
}

impl UseDefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.last_use.contains_key(name)
    }

    /// Seed `name` unless it is already tracked
    pub fn declare(&mut self, name: &str, value: DataflowValue) {
        if !self.last_use.contains_key(name) {
            self.last_use
                .insert(name.to_string(), BTreeSet::from([value]));
        }
    }

    /// Read of `name`: link every last use to `value`, then replace them
    pub fn read(&mut self, name: &str, value: DataflowValue) {
        if let Some(previous) = self.last_use.get(name) {
            for from in previous {
                self.edges.insert(DataEdge {
                    from: *from,
                    to: value,
                    variable: name.to_string(),
                });
            }
        }
        self.last_use
            .insert(name.to_string(), BTreeSet::from([value]));
    }

    /// Write of `name`: replace the last uses without linking
    pub fn write(&mut self, name: &str, value: DataflowValue) {
        self.last_use
            .insert(name.to_string(), BTreeSet::from([value]));
    }

    pub fn last_uses(&self, name: &str) -> impl Iterator<Item = DataflowValue> + '_ {
        self.last_use
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

impl AbstractStore for UseDefStore {
    const ANALYSIS: &'static str = "use-def";

    fn join(&self, other: &Self) -> Self {
        let mut last_use = self.last_use.clone();
        for (name, values) in &other.last_use {
            last_use
                .entry(name.clone())
                .or_default()
                .extend(values.iter().copied());
        }
        let edges = self.edges.union(&other.edges).cloned().collect();
        Self { last_use, edges }
    }

    fn less_than_or_equal(&self, other: &Self) -> bool {
        self.edges.is_subset(&other.edges)
            && self.last_use.iter().all(|(name, values)| {
                other
                    .last_use
                    .get(name)
                    .is_some_and(|theirs| values.is_subset(theirs))
            })
    }
}
