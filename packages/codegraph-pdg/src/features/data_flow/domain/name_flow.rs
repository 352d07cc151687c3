//! Name-flow store
//!
//! Tracks, per variable, the symbolic names that were assigned into it:
//! literals, other variables and call results. Records only accumulate.

use super::store::{AbstractStore, DataflowValue};
use crate::features::flow_graph::CfgNodeId;
use crate::features::syntax::ProcedureSignature;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    Variable,
    Method,
    Literal,
}

/// One symbolic name flowing into a variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub kind: NameKind,
    /// Leaf node the name was read from
    pub origin: DataflowValue,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, kind: NameKind, origin: CfgNodeId) -> Self {
        Self {
            name: name.into(),
            kind,
            origin: DataflowValue(origin),
        }
    }
}

/// Formal parameter of a resolved callee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormalRef {
    pub callee: ProcedureSignature,
    pub position: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameStore {
    /// variable → names assigned into it
    pub xi: BTreeMap<String, BTreeSet<NameRecord>>,
    /// Variables appearing in `return` expressions
    pub returned_variables: BTreeSet<String>,
    /// variable → declaration nodes seen for that name
    pub declaring_nodes: BTreeMap<String, BTreeSet<CfgNodeId>>,
    /// Actual arguments bound into callee formals
    pub argument_bindings: BTreeMap<FormalRef, BTreeSet<NameRecord>>,
}

impl NameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, node: CfgNodeId) {
        self.declaring_nodes
            .entry(name.to_string())
            .or_default()
            .insert(node);
    }

    pub fn assign(&mut self, target: &str, records: impl IntoIterator<Item = NameRecord>) {
        self.xi
            .entry(target.to_string())
            .or_default()
            .extend(records);
    }

    pub fn bind_argument(&mut self, formal: FormalRef, records: impl IntoIterator<Item = NameRecord>) {
        self.argument_bindings
            .entry(formal)
            .or_default()
            .extend(records);
    }

    pub fn mark_returned(&mut self, name: &str) {
        self.returned_variables.insert(name.to_string());
    }

    /// A variable is tracked once a declaration for it has been seen
    pub fn is_tracked(&self, name: &str) -> bool {
        self.declaring_nodes.contains_key(name)
    }

    /// First declaration node of `name` in node order
    pub fn declaring_node(&self, name: &str) -> Option<CfgNodeId> {
        self.declaring_nodes
            .get(name)
            .and_then(|nodes| nodes.iter().next().copied())
    }

    pub fn records(&self, name: &str) -> impl Iterator<Item = &NameRecord> {
        self.xi.get(name).into_iter().flat_map(|set| set.iter())
    }

    /// `(variable, other)` pairs where `other` is a tracked variable that
    /// flowed into `variable`
    ///
    /// Method results are excluded, as are self-references. Names are
    /// compared as raw text, so two declarations sharing a name in disjoint
    /// scopes are not told apart.
    pub fn name_links(&self) -> BTreeSet<(String, String)> {
        let mut links = BTreeSet::new();
        for (variable, records) in &self.xi {
            if !self.is_tracked(variable) {
                continue;
            }
            for record in records {
                if record.kind == NameKind::Method
                    || record.name == *variable
                    || !self.is_tracked(&record.name)
                {
                    continue;
                }
                links.insert((variable.clone(), record.name.clone()));
            }
        }
        links
    }
}

fn union_into<K: Ord + Clone, V: Ord + Clone>(
    into: &mut BTreeMap<K, BTreeSet<V>>,
    from: &BTreeMap<K, BTreeSet<V>>,
) {
    for (key, values) in from {
        into.entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}

fn subset_by_key<K: Ord, V: Ord>(
    small: &BTreeMap<K, BTreeSet<V>>,
    large: &BTreeMap<K, BTreeSet<V>>,
) -> bool {
    small.iter().all(|(key, values)| {
        large
            .get(key)
            .is_some_and(|theirs| values.is_subset(theirs))
    })
}

impl AbstractStore for NameStore {
    const ANALYSIS: &'static str = "name-flow";

    fn join(&self, other: &Self) -> Self {
        let mut joined = self.clone();
        union_into(&mut joined.xi, &other.xi);
        union_into(&mut joined.declaring_nodes, &other.declaring_nodes);
        union_into(&mut joined.argument_bindings, &other.argument_bindings);
        joined
            .returned_variables
            .extend(other.returned_variables.iter().cloned());
        joined
    }

    fn less_than_or_equal(&self, other: &Self) -> bool {
        self.returned_variables.is_subset(&other.returned_variables)
            && subset_by_key(&self.xi, &other.xi)
            && subset_by_key(&self.declaring_nodes, &other.declaring_nodes)
            && subset_by_key(&self.argument_bindings, &other.argument_bindings)
    }
}
