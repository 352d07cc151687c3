/*
 * PDG (Program Dependence Graph) Module
 *
 * ProcedurePdg = elements of one procedure + CONTROL/DATA/NAME/CALL/EXIT edges
 * FilePdg      = every ProcedurePdg of a file + inter-procedure edges
 *
 * - petgraph multigraph, node_map for id lookup
 * - exact-duplicate edges are dropped on insert
 * - serde through DTOs (elements and edges in id/sort order)
 */

use crate::errors::Result;
use crate::features::pdg::domain::{
    EdgeKind, ElementId, ElementKind, ElementRef, PdgEdge, PdgElement, ProcedureId,
};
use crate::features::syntax::{ProcedureSignature, SyntaxId};
use crate::shared::models::Span;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// ═══════════════════════════════════════════════════════════════════════════
// ProcedurePdg
// ═══════════════════════════════════════════════════════════════════════════

/// Serializable DTO for ProcedurePdg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedurePdgDto {
    pub id: ProcedureId,
    pub signature: ProcedureSignature,
    pub declaration: SyntaxId,
    pub elements: Vec<PdgElement>,
    pub edges: Vec<PdgEdge>,
}

/// Program dependence graph of one procedure
///
/// Element ids are dense: 0 Entry, 1 Exit, 2 ExceptionalExit, then fragments.
#[derive(Debug, Clone)]
pub struct ProcedurePdg {
    /// petgraph directed multigraph
    graph: DiGraph<PdgElement, PdgEdge>,
    /// Element id to petgraph NodeIndex mapping
    node_map: FxHashMap<ElementId, NodeIndex>,
    /// Edges already present, for duplicate suppression
    edge_set: FxHashSet<PdgEdge>,
    pub id: ProcedureId,
    pub signature: ProcedureSignature,
    /// Procedure fragment in the syntax tree
    pub declaration: SyntaxId,
}

impl Serialize for ProcedurePdg {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let dto = ProcedurePdgDto {
            id: self.id,
            signature: self.signature.clone(),
            declaration: self.declaration,
            elements: self.elements().cloned().collect(),
            edges: self.sorted_edges(),
        };
        dto.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProcedurePdg {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let dto = ProcedurePdgDto::deserialize(deserializer)?;
        let mut pdg = ProcedurePdg::empty(dto.id, dto.signature, dto.declaration);
        for element in dto.elements {
            pdg.insert_element(element);
        }
        for edge in dto.edges {
            pdg.insert_edge(edge);
        }
        Ok(pdg)
    }
}

impl PartialEq for ProcedurePdg {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.signature == other.signature
            && self.declaration == other.declaration
            && self.elements().eq(other.elements())
            && self.sorted_edges() == other.sorted_edges()
    }
}

impl ProcedurePdg {
    fn empty(id: ProcedureId, signature: ProcedureSignature, declaration: SyntaxId) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: FxHashMap::default(),
            edge_set: FxHashSet::default(),
            id,
            signature,
            declaration,
        }
    }

    /// New PDG holding only Entry, Exit and ExceptionalExit
    pub fn new(
        id: ProcedureId,
        signature: ProcedureSignature,
        declaration: SyntaxId,
        span: Span,
    ) -> Self {
        let mut pdg = Self::empty(id, signature, declaration);
        for (kind, label) in [
            (ElementKind::Entry, "Entry"),
            (ElementKind::Exit, "Exit"),
            (ElementKind::ExceptionalExit, "ExceptionalExit"),
        ] {
            pdg.add_element(kind, label, span);
        }
        pdg
    }

    fn insert_element(&mut self, element: PdgElement) -> ElementId {
        let id = element.id;
        let idx = self.graph.add_node(element);
        self.node_map.insert(id, idx);
        id
    }

    /// Add element with the next free id
    pub fn add_element(&mut self, kind: ElementKind, label: impl Into<String>, span: Span) -> ElementId {
        let id = ElementId(self.graph.node_count() as u32);
        self.insert_element(PdgElement {
            id,
            kind,
            label: label.into(),
            span,
            procedure: self.id,
        })
    }

    fn insert_edge(&mut self, edge: PdgEdge) -> bool {
        let from = self.node_map.get(&edge.from.element);
        let to = self.node_map.get(&edge.to.element);

        if let (Some(&from), Some(&to)) = (from, to) {
            if !self.edge_set.insert(edge.clone()) {
                return false;
            }
            self.graph.add_edge(from, to, edge);
            return true;
        }
        false
    }

    /// Add an edge between two elements of this procedure
    ///
    /// Returns false when an endpoint is unknown or the same edge (endpoints,
    /// kind and label) is already present.
    pub fn add_edge(
        &mut self,
        from: ElementId,
        to: ElementId,
        kind: EdgeKind,
        label: Option<String>,
    ) -> bool {
        let edge = PdgEdge::new(
            ElementRef::new(self.id, from),
            ElementRef::new(self.id, to),
            kind,
            label,
        );
        self.insert_edge(edge)
    }

    /// Get element by id
    pub fn element(&self, id: ElementId) -> Option<&PdgElement> {
        self.node_map
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Elements in id order
    pub fn elements(&self) -> impl Iterator<Item = &PdgElement> {
        self.graph.node_weights()
    }

    /// Selected fragments only
    pub fn fragments(&self) -> impl Iterator<Item = &PdgElement> {
        self.elements().filter(|e| !e.kind.is_synthetic())
    }

    pub fn element_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.node_map.contains_key(&id)
    }

    /// Element selected for a fragment
    pub fn element_for_syntax(&self, syntax: SyntaxId) -> Option<&PdgElement> {
        self.elements().find(|e| e.kind.syntax() == Some(syntax))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &PdgEdge> {
        self.graph.edge_weights()
    }

    /// Edges in (from, to, kind, label) order
    pub fn sorted_edges(&self) -> Vec<PdgEdge> {
        let mut edges: Vec<PdgEdge> = self.edges().cloned().collect();
        edges.sort();
        edges
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &PdgEdge> {
        self.edges().filter(move |e| e.kind == kind)
    }

    pub fn has_edge(&self, from: ElementId, to: ElementId, kind: EdgeKind) -> bool {
        self.edges_of_kind(kind)
            .any(|e| e.from.element == from && e.to.element == to)
    }

    /// Get all incoming edges (dependencies) for an element
    pub fn dependencies(&self, id: ElementId) -> Vec<&PdgEdge> {
        let Some(&idx) = self.node_map.get(&id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight())
            .collect()
    }

    /// Get all outgoing edges (dependents) for an element
    pub fn dependents(&self, id: ElementId) -> Vec<&PdgEdge> {
        let Some(&idx) = self.node_map.get(&id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight())
            .collect()
    }

    /// Elements not reachable from Entry over CONTROL edges
    ///
    /// Synthetic elements are never reported; ExceptionalExit is legitimately
    /// unreachable in procedures that cannot throw.
    pub fn unreachable_from_entry(&self) -> Vec<ElementId> {
        let Some(&entry) = self.node_map.get(&ElementId::ENTRY) else {
            return Vec::new();
        };

        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::from([entry]);
        while let Some(current) = worklist.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for edge in self.graph.edges_directed(current, Direction::Outgoing) {
                if edge.weight().kind == EdgeKind::Control {
                    worklist.push_back(edge.target());
                }
            }
        }

        self.graph
            .node_indices()
            .filter(|idx| !visited.contains(idx))
            .filter_map(|idx| self.graph.node_weight(idx))
            .filter(|e| !e.kind.is_synthetic())
            .map(|e| e.id)
            .collect()
    }

    /// Get statistics
    pub fn stats(&self) -> PdgStats {
        let mut stats = PdgStats {
            element_count: self.graph.node_count(),
            ..PdgStats::default()
        };
        for edge in self.graph.edge_weights() {
            stats.count(edge.kind);
        }
        stats
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statistics
// ═══════════════════════════════════════════════════════════════════════════

/// PDG Statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdgStats {
    pub element_count: usize,
    pub edge_count: usize,
    pub control_edges: usize,
    pub data_edges: usize,
    pub call_edges: usize,
    pub name_edges: usize,
    pub exit_edges: usize,
}

impl PdgStats {
    fn count(&mut self, kind: EdgeKind) {
        self.edge_count += 1;
        match kind {
            EdgeKind::Control => self.control_edges += 1,
            EdgeKind::Data => self.data_edges += 1,
            EdgeKind::Call => self.call_edges += 1,
            EdgeKind::Name => self.name_edges += 1,
            EdgeKind::Exit => self.exit_edges += 1,
        }
    }

    fn merge(&mut self, other: &PdgStats) {
        self.element_count += other.element_count;
        self.edge_count += other.edge_count;
        self.control_edges += other.control_edges;
        self.data_edges += other.data_edges;
        self.call_edges += other.call_edges;
        self.name_edges += other.name_edges;
        self.exit_edges += other.exit_edges;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FilePdg
// ═══════════════════════════════════════════════════════════════════════════

/// Every procedure of one compilation unit plus the edges between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePdg {
    pub path: String,
    /// In input order; `ProcedureId` is the position
    pub procedures: Vec<ProcedurePdg>,
    /// Edges whose endpoints lie in different procedures
    pub interprocedural_edges: BTreeSet<PdgEdge>,
}

impl FilePdg {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            procedures: Vec::new(),
            interprocedural_edges: BTreeSet::new(),
        }
    }

    pub fn procedure(&self, id: ProcedureId) -> Option<&ProcedurePdg> {
        self.procedures.get(id.index())
    }

    pub fn procedure_mut(&mut self, id: ProcedureId) -> Option<&mut ProcedurePdg> {
        self.procedures.get_mut(id.index())
    }

    pub fn procedure_by_signature(&self, signature: &ProcedureSignature) -> Option<&ProcedurePdg> {
        self.procedures.iter().find(|p| &p.signature == signature)
    }

    /// Procedures whose simple name matches, in input order
    pub fn procedures_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ProcedurePdg> {
        self.procedures
            .iter()
            .filter(move |p| p.signature.name == name)
    }

    pub fn element(&self, element: ElementRef) -> Option<&PdgElement> {
        self.procedure(element.procedure)?.element(element.element)
    }

    /// Route an edge to its procedure, or to the inter-procedure set
    pub fn add_edge(&mut self, edge: PdgEdge) -> bool {
        if edge.is_interprocedural() {
            let known = self.element(edge.from).is_some() && self.element(edge.to).is_some();
            return known && self.interprocedural_edges.insert(edge);
        }
        match self.procedure_mut(edge.from.procedure) {
            Some(pdg) => pdg.add_edge(edge.from.element, edge.to.element, edge.kind, edge.label),
            None => false,
        }
    }

    /// Intra- and inter-procedure edges in (from, to, kind, label) order
    pub fn all_edges(&self) -> Vec<PdgEdge> {
        let mut edges: Vec<PdgEdge> = self
            .procedures
            .iter()
            .flat_map(|p| p.edges().cloned())
            .chain(self.interprocedural_edges.iter().cloned())
            .collect();
        edges.sort();
        edges
    }

    /// Stats summed over procedures, plus inter-procedure edges
    pub fn stats(&self) -> PdgStats {
        let mut stats = PdgStats::default();
        for procedure in &self.procedures {
            stats.merge(&procedure.stats());
        }
        for edge in &self.interprocedural_edges {
            stats.count(edge.kind);
        }
        stats
    }

    /// Edge counts per kind, in kind order
    pub fn edge_histogram(&self) -> BTreeMap<EdgeKind, usize> {
        let mut histogram = BTreeMap::new();
        for edge in self.all_edges() {
            *histogram.entry(edge.kind).or_insert(0) += 1;
        }
        histogram
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
