//! DATA and NAME edges from dataflow results
//!
//! Node-level results are lifted to elements through the node index.
//! Formal parameters lift to Entry. An endpoint that lifts to nothing drops
//! the edge, as does an edge whose endpoints lift to the same element.

use super::node_index::NodeElementIndex;
use super::pdg::ProcedurePdg;
use crate::features::data_flow::{DataEdge, NameStore};
use crate::features::flow_graph::{CfgNodeId, ControlFlowGraph};
use crate::features::pdg::domain::{EdgeKind, ElementId};
use std::collections::BTreeSet;
use tracing::debug;

/// Label of the NAME edge binding a returned variable to Entry
pub const RETURN_LABEL: &str = "return";

/// Lifts CFG nodes of one procedure to its elements
pub struct ElementResolver<'a> {
    cfg: &'a ControlFlowGraph,
    index: &'a NodeElementIndex,
}

impl<'a> ElementResolver<'a> {
    pub fn new(cfg: &'a ControlFlowGraph, index: &'a NodeElementIndex) -> Self {
        Self { cfg, index }
    }

    pub fn element_of(&self, node: CfgNodeId) -> Option<ElementId> {
        if self.cfg.parameters().contains(&node) {
            return Some(ElementId::ENTRY);
        }
        self.index.element_of(node)
    }

    /// Element declaring `name`, per the name-flow store
    pub fn declaring_element(&self, store: &NameStore, name: &str) -> Option<ElementId> {
        store
            .declaring_node(name)
            .and_then(|node| self.element_of(node))
    }
}

/// Add DATA edges labelled with the variable; returns how many were new
pub fn add_data_edges(
    pdg: &mut ProcedurePdg,
    resolver: &ElementResolver<'_>,
    edges: &BTreeSet<DataEdge>,
) -> usize {
    let mut added = 0;
    for edge in edges {
        let (Some(from), Some(to)) = (
            resolver.element_of(edge.from.node()),
            resolver.element_of(edge.to.node()),
        ) else {
            debug!(
                from = %edge.from.node(),
                to = %edge.to.node(),
                variable = %edge.variable,
                "DATA endpoint outside any element; dropped"
            );
            continue;
        };
        if from == to {
            continue;
        }
        if pdg.add_edge(from, to, EdgeKind::Data, Some(edge.variable.clone())) {
            added += 1;
        }
    }
    added
}

/// Add NAME edges between declaring elements, plus return bindings
pub fn add_name_edges(
    pdg: &mut ProcedurePdg,
    resolver: &ElementResolver<'_>,
    store: &NameStore,
) -> usize {
    let mut added = 0;

    for (variable, other) in store.name_links() {
        let (Some(from), Some(to)) = (
            resolver.declaring_element(store, &variable),
            resolver.declaring_element(store, &other),
        ) else {
            debug!(%variable, %other, "NAME endpoint without declaring element; dropped");
            continue;
        };
        if from == to {
            continue;
        }
        if pdg.add_edge(from, to, EdgeKind::Name, Some(variable)) {
            added += 1;
        }
    }

    for variable in &store.returned_variables {
        let Some(from) = resolver.declaring_element(store, variable) else {
            continue;
        };
        if from == ElementId::ENTRY {
            continue;
        }
        if pdg.add_edge(
            from,
            ElementId::ENTRY,
            EdgeKind::Name,
            Some(RETURN_LABEL.to_string()),
        ) {
            added += 1;
        }
    }
    added
}
